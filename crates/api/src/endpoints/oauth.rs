//! OAuth login and callback endpoints for the three providers.
//!
//! `/auth/{provider}/login` redirects the browser to the provider's consent
//! page; `/auth/{provider}/callback` exchanges the returned code, finds or
//! creates the provider account, and issues that scheme's session cookie.
//! The callback is driven by the provider redirect, not called directly by
//! the frontend.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use graduon_common::{AppError, AppResult};
use graduon_core::{generate_state, AuthScheme};
use serde::{Deserialize, Serialize};

use crate::{cookies::issue_session_cookie, middleware::AppState, response::ApiResponse};

/// Query parameters a provider sends back to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackQuery {
    /// Extract the code and state, surfacing provider-reported errors.
    fn into_parts(self, provider: &str) -> AppResult<(String, String)> {
        if let Some(error) = self.error {
            // The user denying consent lands here; it is the client's flow
            // that failed, not our infrastructure.
            return Err(AppError::BadRequest(format!("{provider} login failed: {error}")));
        }
        match (self.code, self.state) {
            (Some(code), Some(state)) => Ok((code, state)),
            _ => Err(AppError::BadRequest(format!(
                "{provider} callback is missing code or state"
            ))),
        }
    }
}

/// Profile returned after a successful OAuth login.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthLoginResponse {
    pub id: i32,
    pub email: Option<String>,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub picture: Option<String>,
}

/// Redirect to Google's consent page.
async fn google_login(State(state): State<AppState>) -> AppResult<Redirect> {
    let url = state.google.authorization_url(&generate_state())?;
    Ok(Redirect::temporary(&url))
}

/// Handle Google's callback: exchange, link, and set the session cookie.
async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> AppResult<(CookieJar, ApiResponse<OAuthLoginResponse>)> {
    let (code, oauth_state) = query.into_parts("Google")?;

    let profile = state.google.exchange_code(&code, &oauth_state).await?;
    let account = state.oauth_service.login_google(&profile).await?;

    let token = state.codec.sign(&account.google_id);
    let jar = issue_session_cookie(
        jar,
        AuthScheme::Google,
        token,
        Some(state.session_max_age_days),
    );

    Ok((
        jar,
        ApiResponse::ok(OAuthLoginResponse {
            id: account.id,
            email: Some(account.email),
            name: Some(account.name),
            nickname: None,
            picture: account.picture,
        }),
    ))
}

/// Redirect to Kakao's consent page.
async fn kakao_login(State(state): State<AppState>) -> AppResult<Redirect> {
    let url = state.kakao.authorization_url(&generate_state())?;
    Ok(Redirect::temporary(&url))
}

/// Handle Kakao's callback: exchange, link, and set the session cookie.
async fn kakao_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> AppResult<(CookieJar, ApiResponse<OAuthLoginResponse>)> {
    let (code, oauth_state) = query.into_parts("Kakao")?;

    let profile = state.kakao.exchange_code(&code, &oauth_state).await?;
    let account = state.oauth_service.login_kakao(&profile).await?;

    let token = state.codec.sign(&account.kakao_id);
    let jar = issue_session_cookie(
        jar,
        AuthScheme::Kakao,
        token,
        Some(state.session_max_age_days),
    );

    Ok((
        jar,
        ApiResponse::ok(OAuthLoginResponse {
            id: account.id,
            email: None,
            name: None,
            nickname: account.nickname,
            picture: account.picture,
        }),
    ))
}

/// Redirect to Naver's consent page.
async fn naver_login(State(state): State<AppState>) -> AppResult<Redirect> {
    let url = state.naver.authorization_url(&generate_state())?;
    Ok(Redirect::temporary(&url))
}

/// Handle Naver's callback: exchange, link, and set the session cookie.
async fn naver_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> AppResult<(CookieJar, ApiResponse<OAuthLoginResponse>)> {
    let (code, oauth_state) = query.into_parts("Naver")?;

    let profile = state.naver.exchange_code(&code, &oauth_state).await?;
    let account = state.oauth_service.login_naver(&profile).await?;

    let token = state.codec.sign(&account.naver_id);
    let jar = issue_session_cookie(
        jar,
        AuthScheme::Naver,
        token,
        Some(state.session_max_age_days),
    );

    Ok((
        jar,
        ApiResponse::ok(OAuthLoginResponse {
            id: account.id,
            email: Some(account.email),
            name: Some(account.name),
            nickname: None,
            picture: account.picture,
        }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/google/login", get(google_login))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/kakao/login", get(kakao_login))
        .route("/auth/kakao/callback", get(kakao_callback))
        .route("/auth/naver/login", get(naver_login))
        .route("/auth/naver/callback", get(naver_callback))
}
