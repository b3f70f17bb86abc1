//! End-to-end authentication flow tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test auth_flow -- --ignored`
//!
//! See `graduon-db`'s test utilities for the environment variables used to
//! locate the test database.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use graduon_common::{config::VerificationConfig, AppError, AppResult, TokenCodec};
use graduon_core::{
    AuthScheme, Identity, IdentityResolver, LocalAccountService, MailTransport, SchemeTokens,
    SignupInput, VerificationFlow, VerificationService,
};
use graduon_db::repositories::{
    GoogleAccountRepository, KakaoAccountRepository, LocalAccountRepository,
    NaverAccountRepository,
};
use graduon_db::test_utils::TestDatabase;

/// Captures outbound mail so the test can read the issued code.
#[derive(Default)]
struct RecordingMailer {
    bodies: Mutex<Vec<String>>,
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(
        &self,
        _to: &str,
        _subject: &str,
        text_body: &str,
        _html_body: &str,
    ) -> AppResult<()> {
        self.bodies.lock().unwrap().push(text_body.to_string());
        Ok(())
    }
}

impl RecordingMailer {
    /// Pull the verification code out of the last message body.
    fn last_code(&self) -> String {
        let bodies = self.bodies.lock().unwrap();
        let body = bodies.last().expect("no mail was sent");
        body.split_whitespace()
            .find(|word| {
                let word = word.trim_end_matches('.');
                word.len() == 6
                    && word
                        .bytes()
                        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            })
            .expect("no code in mail body")
            .trim_end_matches('.')
            .to_string()
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_signup_verify_login_flow() {
    let db = TestDatabase::create_unique().await.unwrap();
    graduon_db::migrate(db.connection()).await.unwrap();
    let conn = Arc::new(sea_orm::Database::connect(db.config.database_url()).await.unwrap());

    let accounts = LocalAccountRepository::new(Arc::clone(&conn));
    let account_service = LocalAccountService::new(accounts.clone());
    let mailer = Arc::new(RecordingMailer::default());
    let verification = VerificationService::new(
        accounts.clone(),
        mailer.clone(),
        VerificationConfig::default(),
    );

    // Signup creates an inactive account.
    let account = account_service
        .signup(SignupInput {
            email: "a@x.com".to_string(),
            password: "alice123".to_string(),
        })
        .await
        .unwrap();
    assert!(!account.is_active);

    // Login before verification is rejected as inactive.
    let result = account_service.login("a@x.com", "alice123").await;
    assert!(matches!(result, Err(AppError::AccountInactive)));

    // Issue and confirm the verification code.
    verification
        .issue(VerificationFlow::SignupVerification, "a@x.com")
        .await
        .unwrap();
    let code = mailer.last_code();

    verification.confirm_signup("a@x.com", &code).await.unwrap();

    // Account is active and the challenge is fully cleared.
    let account = accounts.get_by_email("a@x.com").await.unwrap();
    assert!(account.is_active);
    assert!(account.verification_code.is_none());
    assert!(account.code_created_at.is_none());
    assert_eq!(account.verification_attempts, 0);
    assert!(account.last_attempt_at.is_none());

    // Login now succeeds and yields a verifiable session token.
    let account = account_service.login("a@x.com", "alice123").await.unwrap();
    let codec = TokenCodec::new("integration-test-key");
    let token = codec.sign(&account.email);
    assert_eq!(codec.verify(&token).as_deref(), Some("a@x.com"));

    // And the resolver accepts the cookie.
    let resolver = IdentityResolver::new(
        codec,
        accounts.clone(),
        GoogleAccountRepository::new(Arc::clone(&conn)),
        KakaoAccountRepository::new(Arc::clone(&conn)),
        NaverAccountRepository::new(Arc::clone(&conn)),
    );
    let mut tokens = SchemeTokens::default();
    tokens.set(AuthScheme::Local, token);
    let identity = resolver.resolve(&tokens).await.unwrap();
    assert_eq!(
        identity,
        Identity::Local {
            email: "a@x.com".to_string()
        }
    );

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_shared_counter_and_reset_flow() {
    let db = TestDatabase::create_unique().await.unwrap();
    graduon_db::migrate(db.connection()).await.unwrap();
    let conn = Arc::new(sea_orm::Database::connect(db.config.database_url()).await.unwrap());

    let accounts = LocalAccountRepository::new(Arc::clone(&conn));
    let account_service = LocalAccountService::new(accounts.clone());
    let mailer = Arc::new(RecordingMailer::default());
    let config = VerificationConfig {
        code_ttl_minutes: 60,
        max_attempts: 2,
        backoff_minutes: 15,
    };
    let verification = VerificationService::new(accounts.clone(), mailer.clone(), config);

    account_service
        .signup(SignupInput {
            email: "b@x.com".to_string(),
            password: "bob456".to_string(),
        })
        .await
        .unwrap();

    // Two issuances (one per flow) exhaust the shared budget.
    verification
        .issue(VerificationFlow::SignupVerification, "b@x.com")
        .await
        .unwrap();
    verification
        .issue(VerificationFlow::PasswordReset, "b@x.com")
        .await
        .unwrap();

    let result = verification
        .issue(VerificationFlow::SignupVerification, "b@x.com")
        .await;
    assert!(matches!(result, Err(AppError::RateLimited { .. })));

    // Confirming the outstanding reset code clears the counter and the
    // window re-opens immediately for either flow.
    let code = mailer.last_code();
    verification
        .confirm_password_reset("b@x.com", &code, "newpass789")
        .await
        .unwrap();

    verification
        .issue(VerificationFlow::SignupVerification, "b@x.com")
        .await
        .unwrap();

    let account = accounts.get_by_email("b@x.com").await.unwrap();
    assert_eq!(account.verification_attempts, 1);

    db.drop_database().await.unwrap();
}
