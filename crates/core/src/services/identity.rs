//! Identity resolution across the four authentication schemes.
//!
//! A request may carry up to four signed session tokens, one per scheme.
//! Resolution tries them in a fixed priority order and stops at the first
//! token that decodes to an active account. The order is policy: a local
//! email session outranks any OAuth session when both cookies are present.

use graduon_common::{AppError, AppResult, TokenCodec};
use graduon_db::repositories::{
    GoogleAccountRepository, KakaoAccountRepository, LocalAccountRepository,
    NaverAccountRepository,
};

/// The four disjoint credential schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    /// Local email/password account.
    Local,
    /// Google OAuth2 account.
    Google,
    /// Kakao OAuth2 account.
    Kakao,
    /// Naver OAuth2 account.
    Naver,
}

impl AuthScheme {
    /// Resolution priority. Local email wins over any OAuth scheme; the
    /// OAuth order follows the original service's cookie precedence.
    pub const PRIORITY: [Self; 4] = [Self::Local, Self::Google, Self::Kakao, Self::Naver];

    /// Name of the session cookie carrying this scheme's token.
    #[must_use]
    pub const fn cookie_name(self) -> &'static str {
        match self {
            Self::Local => "auth",
            Self::Google => "auth-google",
            Self::Kakao => "auth-kakao",
            Self::Naver => "auth-naver",
        }
    }
}

impl std::fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Local => "local",
            Self::Google => "google",
            Self::Kakao => "kakao",
            Self::Naver => "naver",
        };
        write!(f, "{s}")
    }
}

/// A resolved canonical identity.
///
/// The tag plus the carried identifier form the globally unique key that
/// joins to a Student record. Local sessions are keyed by email; OAuth
/// sessions by the provider's subject id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Authenticated through a local email/password account.
    Local {
        /// Account email (primary key of the local account table).
        email: String,
    },
    /// Authenticated through a Google-linked account.
    Google {
        /// Google subject id.
        subject: String,
    },
    /// Authenticated through a Kakao-linked account.
    Kakao {
        /// Kakao user id.
        subject: String,
    },
    /// Authenticated through a Naver-linked account.
    Naver {
        /// Naver user id.
        subject: String,
    },
}

impl Identity {
    /// The scheme this identity was resolved through.
    #[must_use]
    pub const fn scheme(&self) -> AuthScheme {
        match self {
            Self::Local { .. } => AuthScheme::Local,
            Self::Google { .. } => AuthScheme::Google,
            Self::Kakao { .. } => AuthScheme::Kakao,
            Self::Naver { .. } => AuthScheme::Naver,
        }
    }

    /// The scheme-local identifier (email or provider subject).
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Local { email } => email,
            Self::Google { subject } | Self::Kakao { subject } | Self::Naver { subject } => subject,
        }
    }
}

/// Raw per-scheme tokens extracted from a request, before verification.
#[derive(Debug, Clone, Default)]
pub struct SchemeTokens {
    /// Token from the local-session cookie.
    pub local: Option<String>,
    /// Token from the Google-session cookie.
    pub google: Option<String>,
    /// Token from the Kakao-session cookie.
    pub kakao: Option<String>,
    /// Token from the Naver-session cookie.
    pub naver: Option<String>,
}

impl SchemeTokens {
    fn get(&self, scheme: AuthScheme) -> Option<&str> {
        match scheme {
            AuthScheme::Local => self.local.as_deref(),
            AuthScheme::Google => self.google.as_deref(),
            AuthScheme::Kakao => self.kakao.as_deref(),
            AuthScheme::Naver => self.naver.as_deref(),
        }
    }

    /// Store a raw token under its scheme.
    pub fn set(&mut self, scheme: AuthScheme, token: String) {
        let slot = match scheme {
            AuthScheme::Local => &mut self.local,
            AuthScheme::Google => &mut self.google,
            AuthScheme::Kakao => &mut self.kakao,
            AuthScheme::Naver => &mut self.naver,
        };
        *slot = Some(token);
    }

    /// Whether no scheme carries a token at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.local.is_none() && self.google.is_none() && self.kakao.is_none() && self.naver.is_none()
    }
}

/// Resolves request tokens to a canonical identity.
#[derive(Clone)]
pub struct IdentityResolver {
    codec: TokenCodec,
    local_accounts: LocalAccountRepository,
    google_accounts: GoogleAccountRepository,
    kakao_accounts: KakaoAccountRepository,
    naver_accounts: NaverAccountRepository,
}

impl IdentityResolver {
    /// Create a new identity resolver.
    #[must_use]
    pub const fn new(
        codec: TokenCodec,
        local_accounts: LocalAccountRepository,
        google_accounts: GoogleAccountRepository,
        kakao_accounts: KakaoAccountRepository,
        naver_accounts: NaverAccountRepository,
    ) -> Self {
        Self {
            codec,
            local_accounts,
            google_accounts,
            kakao_accounts,
            naver_accounts,
        }
    }

    /// Resolve the request's tokens to an identity.
    ///
    /// Schemes are tried in [`AuthScheme::PRIORITY`] order. An absent token,
    /// a token that fails verification, an unknown identifier, and an
    /// inactive account all skip to the next scheme rather than failing the
    /// whole resolution; the first active match wins. If every scheme is
    /// exhausted the request is unauthenticated.
    pub async fn resolve(&self, tokens: &SchemeTokens) -> AppResult<Identity> {
        for scheme in AuthScheme::PRIORITY {
            let Some(raw) = tokens.get(scheme) else {
                continue;
            };

            let Some(value) = self.codec.verify(raw) else {
                // Tampered or stale-key token; treat as absent.
                tracing::debug!(%scheme, "Discarding token with invalid signature");
                continue;
            };

            if let Some(identity) = self.lookup_active(scheme, &value).await? {
                return Ok(identity);
            }
        }

        Err(AppError::Unauthenticated)
    }

    /// Look up a decoded token value in its scheme's account table.
    ///
    /// Returns `None` when the account is missing or inactive. There is no
    /// cross-scheme validation: each value is only meaningful against its
    /// own table.
    async fn lookup_active(&self, scheme: AuthScheme, value: &str) -> AppResult<Option<Identity>> {
        let identity = match scheme {
            AuthScheme::Local => self
                .local_accounts
                .find_by_email(value)
                .await?
                .filter(|a| a.is_active)
                .map(|a| Identity::Local { email: a.email }),
            AuthScheme::Google => self
                .google_accounts
                .find_by_subject(value)
                .await?
                .filter(|a| a.is_active)
                .map(|a| Identity::Google { subject: a.google_id }),
            AuthScheme::Kakao => self
                .kakao_accounts
                .find_by_subject(value)
                .await?
                .filter(|a| a.is_active)
                .map(|a| Identity::Kakao { subject: a.kakao_id }),
            AuthScheme::Naver => self
                .naver_accounts
                .find_by_subject(value)
                .await?
                .filter(|a| a.is_active)
                .map(|a| Identity::Naver { subject: a.naver_id }),
        };

        Ok(identity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use graduon_db::entities::{google_account, kakao_account, local_account, naver_account};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn local_row(email: &str, active: bool) -> local_account::Model {
        local_account::Model {
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
            is_active: active,
            verification_code: None,
            code_created_at: None,
            verification_attempts: 0,
            last_attempt_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn google_row(subject: &str) -> google_account::Model {
        google_account::Model {
            id: 1,
            google_id: subject.to_string(),
            email: "alice@gmail.com".to_string(),
            name: "Alice".to_string(),
            picture: None,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn kakao_row(subject: &str) -> kakao_account::Model {
        kakao_account::Model {
            id: 2,
            kakao_id: subject.to_string(),
            nickname: Some("alice".to_string()),
            picture: None,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn naver_row(subject: &str) -> naver_account::Model {
        naver_account::Model {
            id: 3,
            naver_id: subject.to_string(),
            email: "alice@naver.com".to_string(),
            name: "Alice".to_string(),
            picture: None,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn resolver(
        local_db: Arc<DatabaseConnection>,
        google_db: Arc<DatabaseConnection>,
        kakao_db: Arc<DatabaseConnection>,
        naver_db: Arc<DatabaseConnection>,
    ) -> IdentityResolver {
        IdentityResolver::new(
            TokenCodec::new("resolver-test-key"),
            LocalAccountRepository::new(local_db),
            GoogleAccountRepository::new(google_db),
            KakaoAccountRepository::new(kakao_db),
            NaverAccountRepository::new(naver_db),
        )
    }

    fn codec() -> TokenCodec {
        TokenCodec::new("resolver-test-key")
    }

    #[tokio::test]
    async fn test_resolve_local() {
        let local_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[local_row("alice@example.com", true)]])
                .into_connection(),
        );
        let resolver = resolver(local_db, empty_db(), empty_db(), empty_db());

        let tokens = SchemeTokens {
            local: Some(codec().sign("alice@example.com")),
            ..Default::default()
        };

        let identity = resolver.resolve(&tokens).await.unwrap();
        assert_eq!(
            identity,
            Identity::Local {
                email: "alice@example.com".to_string()
            }
        );
        assert_eq!(identity.scheme(), AuthScheme::Local);
    }

    #[tokio::test]
    async fn test_resolve_google() {
        let google_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[google_row("g-123")]])
                .into_connection(),
        );
        let resolver = resolver(empty_db(), google_db, empty_db(), empty_db());

        let tokens = SchemeTokens {
            google: Some(codec().sign("g-123")),
            ..Default::default()
        };

        let identity = resolver.resolve(&tokens).await.unwrap();
        assert_eq!(
            identity,
            Identity::Google {
                subject: "g-123".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_kakao() {
        let kakao_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[kakao_row("k-456")]])
                .into_connection(),
        );
        let resolver = resolver(empty_db(), empty_db(), kakao_db, empty_db());

        let tokens = SchemeTokens {
            kakao: Some(codec().sign("k-456")),
            ..Default::default()
        };

        let identity = resolver.resolve(&tokens).await.unwrap();
        assert_eq!(
            identity,
            Identity::Kakao {
                subject: "k-456".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_naver() {
        let naver_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[naver_row("n-789")]])
                .into_connection(),
        );
        let resolver = resolver(empty_db(), empty_db(), empty_db(), naver_db);

        let tokens = SchemeTokens {
            naver: Some(codec().sign("n-789")),
            ..Default::default()
        };

        let identity = resolver.resolve(&tokens).await.unwrap();
        assert_eq!(
            identity,
            Identity::Naver {
                subject: "n-789".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_local_wins_over_google() {
        // Both cookies present and valid: the local scheme must win, and the
        // Google table must never be queried (its mock has no results).
        let local_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[local_row("alice@example.com", true)]])
                .into_connection(),
        );
        let resolver = resolver(local_db, empty_db(), empty_db(), empty_db());

        let tokens = SchemeTokens {
            local: Some(codec().sign("alice@example.com")),
            google: Some(codec().sign("g-123")),
            ..Default::default()
        };

        let identity = resolver.resolve(&tokens).await.unwrap();
        assert_eq!(identity.scheme(), AuthScheme::Local);
    }

    #[tokio::test]
    async fn test_all_absent_is_unauthenticated() {
        let resolver = resolver(empty_db(), empty_db(), empty_db(), empty_db());

        let result = resolver.resolve(&SchemeTokens::default()).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_all_invalid_is_unauthenticated() {
        let resolver = resolver(empty_db(), empty_db(), empty_db(), empty_db());

        // None of these carry a valid signature, so no table is consulted.
        let tokens = SchemeTokens {
            local: Some("garbage".to_string()),
            google: Some("also.garbage".to_string()),
            kakao: Some(TokenCodec::new("other-key").sign("k-456")),
            naver: Some(String::new()),
        };

        let result = resolver.resolve(&tokens).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_invalid_token_does_not_short_circuit() {
        // Local token is tampered; resolution must fall through to Google.
        let google_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[google_row("g-123")]])
                .into_connection(),
        );
        let resolver = resolver(empty_db(), google_db, empty_db(), empty_db());

        let tokens = SchemeTokens {
            local: Some("tampered-token".to_string()),
            google: Some(codec().sign("g-123")),
            ..Default::default()
        };

        let identity = resolver.resolve(&tokens).await.unwrap();
        assert_eq!(identity.scheme(), AuthScheme::Google);
    }

    #[tokio::test]
    async fn test_inactive_account_is_skipped() {
        let local_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[local_row("alice@example.com", false)]])
                .into_connection(),
        );
        let resolver = resolver(local_db, empty_db(), empty_db(), empty_db());

        let tokens = SchemeTokens {
            local: Some(codec().sign("alice@example.com")),
            ..Default::default()
        };

        let result = resolver.resolve(&tokens).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_skipped() {
        let google_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<google_account::Model>::new()])
                .into_connection(),
        );
        let resolver = resolver(empty_db(), google_db, empty_db(), empty_db());

        let tokens = SchemeTokens {
            google: Some(codec().sign("g-unknown")),
            ..Default::default()
        };

        let result = resolver.resolve(&tokens).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_cookie_names() {
        assert_eq!(AuthScheme::Local.cookie_name(), "auth");
        assert_eq!(AuthScheme::Google.cookie_name(), "auth-google");
        assert_eq!(AuthScheme::Kakao.cookie_name(), "auth-kakao");
        assert_eq!(AuthScheme::Naver.cookie_name(), "auth-naver");
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            AuthScheme::PRIORITY,
            [
                AuthScheme::Local,
                AuthScheme::Google,
                AuthScheme::Kakao,
                AuthScheme::Naver
            ]
        );
    }
}
