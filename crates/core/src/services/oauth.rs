//! OAuth provider clients and account linking.
//!
//! The providers are external collaborators: each one exchanges an
//! authorization code for a provider-subject plus profile fields, or fails.
//! Exchange failures surface as [`AppError::OAuth`] and are never retried.
//! Everything identity-related downstream (find-or-create, cookies,
//! resolution) only sees the extracted [`ProviderProfile`].

use async_trait::async_trait;
use chrono::Utc;
use graduon_common::{config::ProviderConfig, AppError, AppResult};
use graduon_db::{
    entities::{google_account, kakao_account, naver_account},
    repositories::{GoogleAccountRepository, KakaoAccountRepository, NaverAccountRepository},
};
use rand::{distributions::Alphanumeric, Rng};
use sea_orm::Set;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

/// Profile fields extracted from a provider's token exchange.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Provider-scoped stable subject id.
    pub subject: String,
    /// Email, when the provider shares one (Google, Naver).
    pub email: Option<String>,
    /// Display name, when the provider shares one (Google, Naver).
    pub name: Option<String>,
    /// Nickname (Kakao).
    pub nickname: Option<String>,
    /// Profile picture URL.
    pub picture: Option<String>,
}

/// An OAuth2 provider collaborator.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Build the provider's authorization URL for a login redirect.
    fn authorization_url(&self, state: &str) -> AppResult<String>;

    /// Exchange an authorization code for the provider identity.
    async fn exchange_code(&self, code: &str, state: &str) -> AppResult<ProviderProfile>;
}

/// Shared handle to a provider client.
pub type ProviderClient = Arc<dyn OAuthProvider>;

/// Generate a CSRF `state` nonce for an authorization redirect.
#[must_use]
pub fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

async fn post_token_request(
    http: &reqwest::Client,
    token_url: &str,
    params: &[(&str, &str)],
    provider: &str,
) -> AppResult<TokenResponse> {
    let response = http
        .post(token_url)
        .form(params)
        .send()
        .await
        .map_err(|e| AppError::OAuth(format!("{provider} token request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::OAuth(format!(
            "{provider} token exchange rejected ({status}): {body}"
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::OAuth(format!("{provider} token response malformed: {e}")))
}

async fn get_userinfo<T: serde::de::DeserializeOwned>(
    http: &reqwest::Client,
    userinfo_url: &str,
    access_token: &str,
    provider: &str,
) -> AppResult<T> {
    let response = http
        .get(userinfo_url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| AppError::OAuth(format!("{provider} userinfo request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(AppError::OAuth(format!(
            "{provider} userinfo rejected ({status})"
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::OAuth(format!("{provider} userinfo malformed: {e}")))
}

// === Google ===

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Google OAuth2 client.
pub struct GoogleOAuth {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl GoogleOAuth {
    /// Create a Google client from provider credentials.
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleUserinfo {
    sub: Option<String>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[async_trait]
impl OAuthProvider for GoogleOAuth {
    fn authorization_url(&self, state: &str) -> AppResult<String> {
        let url = Url::parse_with_params(
            GOOGLE_AUTH_URL,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", "openid email profile"),
                ("access_type", "offline"),
                ("include_granted_scopes", "true"),
                ("state", state),
            ],
        )
        .map_err(|e| AppError::OAuth(format!("Invalid Google authorization URL: {e}")))?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str, _state: &str) -> AppResult<ProviderProfile> {
        let token = post_token_request(
            &self.http,
            GOOGLE_TOKEN_URL,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ],
            "Google",
        )
        .await?;

        let info: GoogleUserinfo =
            get_userinfo(&self.http, GOOGLE_USERINFO_URL, &token.access_token, "Google").await?;

        // Google must supply subject, email and name.
        match (info.sub, info.email, info.name) {
            (Some(subject), Some(email), Some(name)) => Ok(ProviderProfile {
                subject,
                email: Some(email),
                name: Some(name),
                nickname: None,
                picture: info.picture,
            }),
            _ => Err(AppError::OAuth(
                "Google did not return the required profile fields (id, email, name)".to_string(),
            )),
        }
    }
}

// === Kakao ===

const KAKAO_AUTH_URL: &str = "https://kauth.kakao.com/oauth/authorize";
const KAKAO_TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";
const KAKAO_USERINFO_URL: &str = "https://kapi.kakao.com/v2/user/me";

/// Kakao OAuth2 client.
pub struct KakaoOAuth {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl KakaoOAuth {
    /// Create a Kakao client from provider credentials.
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct KakaoUserinfo {
    id: Option<i64>,
    properties: Option<KakaoProperties>,
}

#[derive(Debug, Deserialize)]
struct KakaoProperties {
    nickname: Option<String>,
    profile_image: Option<String>,
}

#[async_trait]
impl OAuthProvider for KakaoOAuth {
    fn authorization_url(&self, state: &str) -> AppResult<String> {
        let url = Url::parse_with_params(
            KAKAO_AUTH_URL,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| AppError::OAuth(format!("Invalid Kakao authorization URL: {e}")))?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str, _state: &str) -> AppResult<ProviderProfile> {
        let token = post_token_request(
            &self.http,
            KAKAO_TOKEN_URL,
            &[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
            ],
            "Kakao",
        )
        .await?;

        let info: KakaoUserinfo =
            get_userinfo(&self.http, KAKAO_USERINFO_URL, &token.access_token, "Kakao").await?;

        // Kakao shares no email; only the numeric id is mandatory.
        let subject = info
            .id
            .ok_or_else(|| AppError::OAuth("Kakao did not return a user id".to_string()))?
            .to_string();

        let properties = info.properties.unwrap_or(KakaoProperties {
            nickname: None,
            profile_image: None,
        });

        Ok(ProviderProfile {
            subject,
            email: None,
            name: None,
            nickname: properties.nickname,
            picture: properties.profile_image,
        })
    }
}

// === Naver ===

const NAVER_AUTH_URL: &str = "https://nid.naver.com/oauth2.0/authorize";
const NAVER_TOKEN_URL: &str = "https://nid.naver.com/oauth2.0/token";
const NAVER_USERINFO_URL: &str = "https://openapi.naver.com/v1/nid/me";

/// Naver OAuth2 client.
pub struct NaverOAuth {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl NaverOAuth {
    /// Create a Naver client from provider credentials.
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NaverUserinfo {
    response: Option<NaverResponse>,
}

#[derive(Debug, Deserialize)]
struct NaverResponse {
    id: Option<String>,
    email: Option<String>,
    name: Option<String>,
    profile_image: Option<String>,
}

#[async_trait]
impl OAuthProvider for NaverOAuth {
    fn authorization_url(&self, state: &str) -> AppResult<String> {
        let url = Url::parse_with_params(
            NAVER_AUTH_URL,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| AppError::OAuth(format!("Invalid Naver authorization URL: {e}")))?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str, state: &str) -> AppResult<ProviderProfile> {
        // Naver echoes the state into the token exchange.
        let token = post_token_request(
            &self.http,
            NAVER_TOKEN_URL,
            &[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("state", state),
            ],
            "Naver",
        )
        .await?;

        let info: NaverUserinfo =
            get_userinfo(&self.http, NAVER_USERINFO_URL, &token.access_token, "Naver").await?;

        let response = info
            .response
            .ok_or_else(|| AppError::OAuth("Naver did not return a profile".to_string()))?;

        // Naver must supply subject, email and name.
        match (response.id, response.email, response.name) {
            (Some(subject), Some(email), Some(name)) => Ok(ProviderProfile {
                subject,
                email: Some(email),
                name: Some(name),
                nickname: None,
                picture: response.profile_image,
            }),
            _ => Err(AppError::OAuth(
                "Naver did not return the required profile fields (id, email, name)".to_string(),
            )),
        }
    }
}

// === Account linking ===

/// Links exchanged provider profiles to provider account rows.
#[derive(Clone)]
pub struct OAuthService {
    google_accounts: GoogleAccountRepository,
    kakao_accounts: KakaoAccountRepository,
    naver_accounts: NaverAccountRepository,
}

impl OAuthService {
    /// Create a new OAuth account service.
    #[must_use]
    pub const fn new(
        google_accounts: GoogleAccountRepository,
        kakao_accounts: KakaoAccountRepository,
        naver_accounts: NaverAccountRepository,
    ) -> Self {
        Self {
            google_accounts,
            kakao_accounts,
            naver_accounts,
        }
    }

    /// Find or create the Google account for an exchanged profile.
    pub async fn login_google(&self, profile: &ProviderProfile) -> AppResult<google_account::Model> {
        let email = profile
            .email
            .clone()
            .ok_or_else(|| AppError::OAuth("Google profile is missing an email".to_string()))?;
        let name = profile
            .name
            .clone()
            .ok_or_else(|| AppError::OAuth("Google profile is missing a name".to_string()))?;

        let model = google_account::ActiveModel {
            google_id: Set(profile.subject.clone()),
            email: Set(email.clone()),
            name: Set(name.clone()),
            picture: Set(profile.picture.clone()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            ..Default::default()
        };

        let account = self
            .google_accounts
            .find_or_create(&profile.subject, model)
            .await?;

        tracing::info!(account_id = account.id, "Google login resolved");

        // Refresh profile fields the provider may have changed since the
        // first login; concurrent callbacks are last-write-wins here.
        if account.email != email || account.name != name || account.picture != profile.picture {
            let mut active: google_account::ActiveModel = account.into();
            active.email = Set(email);
            active.name = Set(name);
            active.picture = Set(profile.picture.clone());
            active.updated_at = Set(Some(Utc::now().into()));
            return self.google_accounts.update(active).await;
        }

        Ok(account)
    }

    /// Find or create the Kakao account for an exchanged profile.
    pub async fn login_kakao(&self, profile: &ProviderProfile) -> AppResult<kakao_account::Model> {
        let model = kakao_account::ActiveModel {
            kakao_id: Set(profile.subject.clone()),
            nickname: Set(profile.nickname.clone()),
            picture: Set(profile.picture.clone()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            ..Default::default()
        };

        let account = self
            .kakao_accounts
            .find_or_create(&profile.subject, model)
            .await?;

        tracing::info!(account_id = account.id, "Kakao login resolved");

        if account.nickname != profile.nickname || account.picture != profile.picture {
            let mut active: kakao_account::ActiveModel = account.into();
            active.nickname = Set(profile.nickname.clone());
            active.picture = Set(profile.picture.clone());
            active.updated_at = Set(Some(Utc::now().into()));
            return self.kakao_accounts.update(active).await;
        }

        Ok(account)
    }

    /// Find or create the Naver account for an exchanged profile.
    pub async fn login_naver(&self, profile: &ProviderProfile) -> AppResult<naver_account::Model> {
        let email = profile
            .email
            .clone()
            .ok_or_else(|| AppError::OAuth("Naver profile is missing an email".to_string()))?;
        let name = profile
            .name
            .clone()
            .ok_or_else(|| AppError::OAuth("Naver profile is missing a name".to_string()))?;

        let model = naver_account::ActiveModel {
            naver_id: Set(profile.subject.clone()),
            email: Set(email.clone()),
            name: Set(name.clone()),
            picture: Set(profile.picture.clone()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            ..Default::default()
        };

        let account = self
            .naver_accounts
            .find_or_create(&profile.subject, model)
            .await?;

        tracing::info!(account_id = account.id, "Naver login resolved");

        if account.email != email || account.name != name || account.picture != profile.picture {
            let mut active: naver_account::ActiveModel = account.into();
            active.email = Set(email);
            active.name = Set(name);
            active.picture = Set(profile.picture.clone());
            active.updated_at = Set(Some(Utc::now().into()));
            return self.naver_accounts.update(active).await;
        }

        Ok(account)
    }
}
