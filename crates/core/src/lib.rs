//! Core domain services for graduon-rs.
//!
//! This crate holds the authentication and enrollment logic, independent of
//! the HTTP layer:
//!
//! - **Identity**: the canonical [`Identity`] type and the priority-ordered
//!   [`IdentityResolver`]
//! - **Accounts**: local signup/login via [`LocalAccountService`]
//! - **Verification**: the shared email-verification / password-reset code
//!   lifecycle via [`VerificationService`]
//! - **Enrollment**: student and course invariants via [`EnrollmentService`]
//! - **OAuth**: provider clients and account linking via [`OAuthService`]
//! - **Email**: the [`MailTransport`] collaborator and its SMTP implementation
//!
//! Services receive their repositories and collaborators by injection; the
//! only process-wide state is immutable configuration.

pub mod services;

pub use services::*;
