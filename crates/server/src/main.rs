//! Graduon-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use graduon_api::{middleware::AppState, router as api_router};
use graduon_common::{Config, TokenCodec};
use graduon_core::{
    EnrollmentService, GoogleOAuth, IdentityResolver, KakaoOAuth, LocalAccountService, Mailer,
    NaverOAuth, OAuthService, SmtpMailer, VerificationService,
};
use graduon_db::repositories::{
    CourseRecordRepository, GoogleAccountRepository, KakaoAccountRepository,
    LocalAccountRepository, NaverAccountRepository, StudentRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// No-op transport used when no mail section is configured.
struct DisabledMailer;

#[async_trait::async_trait]
impl graduon_core::MailTransport for DisabledMailer {
    async fn send(
        &self,
        to: &str,
        _subject: &str,
        _text_body: &str,
        _html_body: &str,
    ) -> graduon_common::AppResult<()> {
        Err(graduon_common::AppError::Mail(format!(
            "mail transport is not configured, cannot send to {to}"
        )))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graduon=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting graduon-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = graduon_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    graduon_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let local_accounts = LocalAccountRepository::new(Arc::clone(&db));
    let google_accounts = GoogleAccountRepository::new(Arc::clone(&db));
    let kakao_accounts = KakaoAccountRepository::new(Arc::clone(&db));
    let naver_accounts = NaverAccountRepository::new(Arc::clone(&db));
    let students = StudentRepository::new(Arc::clone(&db));
    let courses = CourseRecordRepository::new(Arc::clone(&db));

    // Process-wide signing key; rotating it logs out every session.
    let codec = TokenCodec::new(&config.auth.cookie_secret);

    // Mail transport collaborator
    let mailer: Mailer = match &config.mail {
        Some(mail_config) => Arc::new(SmtpMailer::new(mail_config)?),
        None => {
            tracing::warn!("No mail configuration; verification emails will fail to send");
            Arc::new(DisabledMailer)
        }
    };

    // Initialize services
    let identity_resolver = IdentityResolver::new(
        codec.clone(),
        local_accounts.clone(),
        google_accounts.clone(),
        kakao_accounts.clone(),
        naver_accounts.clone(),
    );
    let account_service = LocalAccountService::new(local_accounts.clone());
    let verification_service = VerificationService::new(
        local_accounts.clone(),
        mailer,
        config.verification.clone(),
    );
    let enrollment_service = EnrollmentService::new(
        students,
        courses,
        google_accounts.clone(),
        kakao_accounts.clone(),
        naver_accounts.clone(),
    );
    let oauth_service = OAuthService::new(google_accounts, kakao_accounts, naver_accounts);

    // Provider clients (outbound token exchange)
    let google = Arc::new(GoogleOAuth::new(config.oauth.google.clone()));
    let kakao = Arc::new(KakaoOAuth::new(config.oauth.kakao.clone()));
    let naver = Arc::new(NaverOAuth::new(config.oauth.naver.clone()));

    // Create app state
    let state = AppState {
        codec,
        identity_resolver,
        account_service,
        verification_service,
        enrollment_service,
        oauth_service,
        google,
        kakao,
        naver,
        session_max_age_days: config.auth.session_max_age_days,
    };

    // Build router
    let app = api_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            graduon_api::middleware::identity_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
