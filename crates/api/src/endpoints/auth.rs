//! Local authentication endpoints: signup, login, logout, and the two
//! verification-code flows.

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use graduon_common::AppResult;
use graduon_core::{AuthScheme, SignupInput, VerificationFlow};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    cookies::{clear_all_session_cookies, issue_session_cookie},
    middleware::AppState,
    response::ApiResponse,
};

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 4, max = 300))]
    pub password: String,
}

/// Signup response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub email: String,
    pub is_active: bool,
}

/// Create a new local account (inactive until email verification).
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<SignupResponse>> {
    req.validate()?;

    let account = state
        .account_service
        .signup(SignupInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(ApiResponse::ok(SignupResponse {
        email: account.email,
        is_active: account.is_active,
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Long-lived cookie instead of a session-scoped one.
    #[serde(default)]
    pub remember: bool,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub email: String,
}

/// Sign in with email and password, issuing the local session cookie.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, ApiResponse<LoginResponse>)> {
    let account = state.account_service.login(&req.email, &req.password).await?;

    let token = state.codec.sign(&account.email);
    let max_age = req.remember.then_some(state.session_max_age_days);
    let jar = issue_session_cookie(jar, AuthScheme::Local, token, max_age);

    Ok((
        jar,
        ApiResponse::ok(LoginResponse {
            email: account.email,
        }),
    ))
}

/// Logout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub ok: bool,
}

/// Sign out by clearing all four scheme cookies.
async fn logout(jar: CookieJar) -> (CookieJar, ApiResponse<LogoutResponse>) {
    let jar = clear_all_session_cookies(jar);
    (jar, ApiResponse::ok(LogoutResponse { ok: true }))
}

/// Request carrying only an email address.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    #[validate(email)]
    pub email: String,
}

/// Request confirming a code.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmCodeRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 6))]
    pub code: String,
}

/// Request confirming a password reset.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetConfirmRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 6))]
    pub code: String,

    #[validate(length(min = 4, max = 300))]
    pub new_password: String,
}

/// Generic ok response for the verification flows.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    pub ok: bool,
}

/// Issue a signup email-verification code.
async fn request_email_verification(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> AppResult<ApiResponse<FlowResponse>> {
    req.validate()?;
    state
        .verification_service
        .issue(VerificationFlow::SignupVerification, &req.email)
        .await?;
    Ok(ApiResponse::ok(FlowResponse { ok: true }))
}

/// Confirm a signup email-verification code, activating the account.
async fn confirm_email_verification(
    State(state): State<AppState>,
    Json(req): Json<ConfirmCodeRequest>,
) -> AppResult<ApiResponse<FlowResponse>> {
    req.validate()?;
    state
        .verification_service
        .confirm_signup(&req.email, &req.code)
        .await?;
    Ok(ApiResponse::ok(FlowResponse { ok: true }))
}

/// Issue a password-reset code.
async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> AppResult<ApiResponse<FlowResponse>> {
    req.validate()?;
    state
        .verification_service
        .issue(VerificationFlow::PasswordReset, &req.email)
        .await?;
    Ok(ApiResponse::ok(FlowResponse { ok: true }))
}

/// Confirm a password-reset code and store the new password.
async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(req): Json<ResetConfirmRequest>,
) -> AppResult<ApiResponse<FlowResponse>> {
    req.validate()?;
    state
        .verification_service
        .confirm_password_reset(&req.email, &req.code, &req.new_password)
        .await?;
    Ok(ApiResponse::ok(FlowResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/verify-email/request", post(request_email_verification))
        .route("/auth/verify-email/confirm", post(confirm_email_verification))
        .route("/auth/password-reset/request", post(request_password_reset))
        .route("/auth/password-reset/confirm", post(confirm_password_reset))
}
