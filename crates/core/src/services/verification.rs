//! Verification-code lifecycle.
//!
//! One challenge per local account, shared between the signup-verification
//! and password-reset flows: both issue against the same attempt counter and
//! backoff window, and a successful confirmation of either flow clears the
//! challenge and re-opens the window for both.
//!
//! Attempts are consumed at issuance only. A mismatched confirmation does
//! not count against the limit.

use chrono::{DateTime, Duration, Utc};
use graduon_common::{
    config::VerificationConfig, generate_verification_code, AppError, AppResult,
};
use graduon_db::{entities::local_account, repositories::LocalAccountRepository};
use sea_orm::Set;

use super::account::hash_password;
use super::email::{password_reset_email, signup_verification_email, Mailer};

/// The two flows sharing the verification challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationFlow {
    /// Activating a freshly signed-up account.
    SignupVerification,
    /// Resetting a forgotten password.
    PasswordReset,
}

/// Manages issuance and confirmation of one-time verification codes.
#[derive(Clone)]
pub struct VerificationService {
    accounts: LocalAccountRepository,
    mailer: Mailer,
    config: VerificationConfig,
}

impl VerificationService {
    /// Create a new verification service.
    #[must_use]
    pub fn new(accounts: LocalAccountRepository, mailer: Mailer, config: VerificationConfig) -> Self {
        Self {
            accounts,
            mailer,
            config,
        }
    }

    /// Issue a fresh code for the given flow and email it to the account.
    ///
    /// The challenge is persisted before the mail is dispatched, so a
    /// transport failure still consumed an attempt; the stored code remains
    /// confirmable if the message made it out.
    pub async fn issue(&self, flow: VerificationFlow, email: &str) -> AppResult<()> {
        let account = self.accounts.get_by_email(email).await?;

        if flow == VerificationFlow::SignupVerification && account.is_active {
            return Err(AppError::AlreadyRegistered(email.to_string()));
        }

        let now = Utc::now();
        check_rate_limit(&account, now, &self.config)?;

        let code = generate_verification_code();
        let attempts = account.verification_attempts + 1;

        let mut active: local_account::ActiveModel = account.into();
        active.verification_code = Set(Some(code.clone()));
        active.code_created_at = Set(Some(now.into()));
        active.verification_attempts = Set(attempts);
        active.last_attempt_at = Set(Some(now.into()));
        active.updated_at = Set(Some(now.into()));
        self.accounts.update(active).await?;

        let ttl = self.config.code_ttl_minutes;
        let (subject, text, html) = match flow {
            VerificationFlow::SignupVerification => signup_verification_email(&code, ttl),
            VerificationFlow::PasswordReset => password_reset_email(&code, ttl),
        };
        self.mailer.send(email, &subject, &text, &html).await?;

        tracing::info!(?flow, attempts, "Verification code issued");

        Ok(())
    }

    /// Confirm the signup flow: activate the account and clear the challenge.
    pub async fn confirm_signup(&self, email: &str, code: &str) -> AppResult<()> {
        let account = self.accounts.get_by_email(email).await?;
        let now = Utc::now();

        check_code(&account, code, now, self.config.code_ttl_minutes)?;

        let mut active: local_account::ActiveModel = account.into();
        active.is_active = Set(true);
        clear_challenge(&mut active, now);
        self.accounts.update(active).await?;

        tracing::info!("Email verified, account activated");

        Ok(())
    }

    /// Confirm the password-reset flow: store the new password hash and
    /// clear the challenge.
    pub async fn confirm_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let account = self.accounts.get_by_email(email).await?;
        let now = Utc::now();

        check_code(&account, code, now, self.config.code_ttl_minutes)?;

        let mut active: local_account::ActiveModel = account.into();
        active.password_hash = Set(hash_password(new_password)?);
        clear_challenge(&mut active, now);
        self.accounts.update(active).await?;

        tracing::info!("Password reset confirmed");

        Ok(())
    }
}

/// Enforce the shared issuance rate limit.
///
/// Once `max_attempts` codes have been issued without a successful
/// confirmation, further issuance must wait out the backoff window counted
/// from the most recent attempt. All comparisons are in UTC.
fn check_rate_limit(
    account: &local_account::Model,
    now: DateTime<Utc>,
    config: &VerificationConfig,
) -> AppResult<()> {
    if i64::from(account.verification_attempts) < i64::from(config.max_attempts) {
        return Ok(());
    }

    if let Some(last_attempt) = account.last_attempt_at {
        let retry_after =
            last_attempt.with_timezone(&Utc) + Duration::minutes(i64::from(config.backoff_minutes));
        if now < retry_after {
            return Err(AppError::RateLimited { retry_after });
        }
    }

    Ok(())
}

/// Validate a submitted code against the stored challenge.
///
/// The mismatch check runs before the expiry check, so an expired challenge
/// with a wrong code still reports a mismatch; only a matching code can be
/// reported as expired.
fn check_code(
    account: &local_account::Model,
    submitted: &str,
    now: DateTime<Utc>,
    ttl_minutes: u32,
) -> AppResult<()> {
    // No outstanding challenge reads the same as a wrong code.
    let (stored, created_at) = match (&account.verification_code, account.code_created_at) {
        (Some(code), Some(created_at)) => (code, created_at),
        _ => return Err(AppError::CodeMismatch),
    };

    if !stored.eq_ignore_ascii_case(submitted) {
        return Err(AppError::CodeMismatch);
    }

    let expires_at = created_at.with_timezone(&Utc) + Duration::minutes(i64::from(ttl_minutes));
    if now > expires_at {
        return Err(AppError::CodeExpired);
    }

    Ok(())
}

/// Clear the challenge and reset the attempt state.
///
/// Resets the shared counter, which re-opens the rate-limit window for both
/// flows at once.
fn clear_challenge(active: &mut local_account::ActiveModel, now: DateTime<Utc>) {
    active.verification_code = Set(None);
    active.code_created_at = Set(None);
    active.verification_attempts = Set(0);
    active.last_attempt_at = Set(None);
    active.updated_at = Set(Some(now.into()));
}
