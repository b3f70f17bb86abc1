//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use graduon_common::TokenCodec;
use graduon_core::{
    AuthScheme, EnrollmentService, IdentityResolver, LocalAccountService, OAuthService,
    ProviderClient, SchemeTokens, VerificationService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Session-token codec (signs cookie values).
    pub codec: TokenCodec,
    /// Identity resolver over the four schemes.
    pub identity_resolver: IdentityResolver,
    /// Local signup/login.
    pub account_service: LocalAccountService,
    /// Verification-code lifecycle.
    pub verification_service: VerificationService,
    /// Student/course invariants.
    pub enrollment_service: EnrollmentService,
    /// Provider account linking.
    pub oauth_service: OAuthService,
    /// Google OAuth client.
    pub google: ProviderClient,
    /// Kakao OAuth client.
    pub kakao: ProviderClient,
    /// Naver OAuth client.
    pub naver: ProviderClient,
    /// Max-age in days for "remember me" sessions.
    pub session_max_age_days: u32,
}

/// Identity-resolution middleware.
///
/// Collects the per-scheme session cookies into [`SchemeTokens`], resolves
/// them, and stashes the winning [`graduon_core::Identity`] in the request
/// extensions. A request that resolves to nothing passes through
/// unauthenticated; protected endpoints reject via the extractor.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());

    let mut tokens = SchemeTokens::default();
    for scheme in AuthScheme::PRIORITY {
        if let Some(cookie) = jar.get(scheme.cookie_name()) {
            // A cleared cookie can linger as an empty value.
            if !cookie.value().is_empty() {
                tokens.set(scheme, cookie.value().to_string());
            }
        }
    }

    if !tokens.is_empty() {
        match state.identity_resolver.resolve(&tokens).await {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
            }
            // Store trouble is a server fault, not an unauthenticated request.
            Err(e) if e.is_server_error() => return e.into_response(),
            Err(e) => {
                tracing::debug!(error = %e, "No scheme resolved for request");
            }
        }
    }

    next.run(req).await
}
