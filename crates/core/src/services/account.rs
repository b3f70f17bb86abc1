//! Local account service.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use graduon_common::{AppError, AppResult};
use graduon_db::{entities::local_account, repositories::LocalAccountRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Local account service for signup and login.
#[derive(Clone)]
pub struct LocalAccountService {
    accounts: LocalAccountRepository,
}

/// Input for creating a new local account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupInput {
    /// Account email address.
    #[validate(email)]
    pub email: String,

    /// Plain-text password, hashed before storage.
    #[validate(length(min = 4, max = 300))]
    pub password: String,
}

impl LocalAccountService {
    /// Create a new local account service.
    #[must_use]
    pub const fn new(accounts: LocalAccountRepository) -> Self {
        Self { accounts }
    }

    /// Create a new, inactive local account.
    ///
    /// The account stays inactive until the signup-verification flow
    /// confirms the email address; issuing the verification code is a
    /// separate operation.
    pub async fn signup(&self, input: SignupInput) -> AppResult<local_account::Model> {
        input.validate()?;

        if self.accounts.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::AlreadyRegistered(input.email));
        }

        let password_hash = hash_password(&input.password)?;

        let model = local_account::ActiveModel {
            email: Set(input.email.clone()),
            password_hash: Set(password_hash),
            is_active: Set(false),
            verification_code: Set(None),
            code_created_at: Set(None),
            verification_attempts: Set(0),
            last_attempt_at: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let account = self.accounts.create(model).await?;

        tracing::info!(email = %account.email, "Local account created (inactive)");

        Ok(account)
    }

    /// Authenticate an email/password pair.
    ///
    /// Unknown email and wrong password both surface as `Unauthenticated`:
    /// the response must not reveal which of the two failed. An account that
    /// never verified its email is rejected separately as `AccountInactive`.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<local_account::Model> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            tracing::debug!("Login failed: unknown email");
            return Err(AppError::Unauthenticated);
        };

        if !verify_password(password, &account.password_hash)? {
            tracing::debug!("Login failed: wrong password");
            return Err(AppError::Unauthenticated);
        }

        if !account.is_active {
            return Err(AppError::AccountInactive);
        }

        Ok(account)
    }
}

/// Hash a password using Argon2.
pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
