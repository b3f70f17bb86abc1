//! Local account repository.

use std::sync::Arc;

use crate::entities::{local_account, LocalAccount};
use graduon_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Local account repository for database operations.
#[derive(Clone)]
pub struct LocalAccountRepository {
    db: Arc<DatabaseConnection>,
}

impl LocalAccountRepository {
    /// Create a new local account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<local_account::Model>> {
        LocalAccount::find_by_id(email)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by email, returning an error if not found.
    pub async fn get_by_email(&self, email: &str) -> AppResult<local_account::Model> {
        self.find_by_email(email)
            .await?
            .ok_or(AppError::AccountNotFound)
    }

    /// Create a new account.
    pub async fn create(&self, model: local_account::ActiveModel) -> AppResult<local_account::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an account.
    pub async fn update(&self, model: local_account::ActiveModel) -> AppResult<local_account::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
