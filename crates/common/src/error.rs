//! Error types for graduon-rs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
///
/// Domain errors carry enough structure for a specific user-facing message;
/// infrastructure errors collapse into a generic server-fault class.
#[derive(Debug, Error)]
pub enum AppError {
    // === Authentication ===
    /// A signed token failed signature or format checks. Always recoverable
    /// by treating the token as absent.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Account is not activated")]
    AccountInactive,

    // === Registration ===
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    // === Verification codes ===
    /// Too many issuance attempts; retry after the carried instant.
    #[error("Rate limited until {retry_after}")]
    RateLimited {
        /// When issuance becomes possible again.
        retry_after: DateTime<Utc>,
    },

    #[error("Verification code does not match")]
    CodeMismatch,

    #[error("Verification code has expired")]
    CodeExpired,

    // === Enrollment ===
    /// The resolved identity has no Student record yet.
    #[error("Student registration required")]
    NotRegistered,

    #[error("Cannot record a retake without an initial attempt: {0}")]
    RetakePreconditionMissing(String),

    #[error("Duplicate enrollment: {0}")]
    DuplicateEnrollment(String),

    // === Generic client errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Mail transport error: {0}")]
    Mail(String),

    #[error("OAuth provider error: {0}")]
    OAuth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::InvalidToken | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::AccountNotFound | Self::NotRegistered | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::AccountInactive => StatusCode::FORBIDDEN,
            Self::AlreadyRegistered(_)
            | Self::DuplicateEnrollment(_)
            | Self::RetakePreconditionMissing(_) => StatusCode::CONFLICT,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::CodeMismatch | Self::CodeExpired | Self::BadRequest(_) | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }

            // 5xx Server Errors
            Self::Database(_)
            | Self::Mail(_)
            | Self::OAuth(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::AlreadyRegistered(_) => "ALREADY_REGISTERED",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::CodeMismatch => "CODE_MISMATCH",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::NotRegistered => "NOT_REGISTERED",
            Self::RetakePreconditionMissing(_) => "RETAKE_PRECONDITION_MISSING",
            Self::DuplicateEnrollment(_) => "DUPLICATE_ENROLLMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Mail(_) => "MAIL_ERROR",
            Self::OAuth(_) => "OAUTH_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = match &self {
            Self::RateLimited { retry_after } => Json(json!({
                "error": {
                    "code": code,
                    "message": self.to_string(),
                    "retryAfter": retry_after.to_rfc3339(),
                }
            })),
            _ => Json(json!({
                "error": {
                    "code": code,
                    "message": self.to_string(),
                }
            })),
        };

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_client_errors() {
        assert!(!AppError::CodeMismatch.is_server_error());
        assert!(!AppError::Unauthenticated.is_server_error());
        assert!(!AppError::DuplicateEnrollment("x".into()).is_server_error());
    }

    #[test]
    fn test_infrastructure_errors_are_server_errors() {
        assert!(AppError::Database("down".into()).is_server_error());
        assert!(AppError::Mail("smtp refused".into()).is_server_error());
        assert!(AppError::OAuth("token exchange failed".into()).is_server_error());
    }

    #[test]
    fn test_rate_limited_status() {
        let err = AppError::RateLimited {
            retry_after: Utc::now(),
        };
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.error_code(), "RATE_LIMITED");
    }
}
