//! OAuth provider account repositories.
//!
//! One repository per provider table. Creation is insert-or-fetch: duplicate
//! OAuth callbacks can race on the same provider subject, so an insert that
//! loses to a concurrent one (unique-constraint violation) is retried as a
//! lookup and both callers observe the same row.

use std::sync::Arc;

use crate::entities::{
    google_account, kakao_account, naver_account, GoogleAccount, KakaoAccount, NaverAccount,
};
use graduon_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
};

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Google account repository for database operations.
#[derive(Clone)]
pub struct GoogleAccountRepository {
    db: Arc<DatabaseConnection>,
}

impl GoogleAccountRepository {
    /// Create a new Google account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by Google subject id.
    pub async fn find_by_subject(&self, subject: &str) -> AppResult<Option<google_account::Model>> {
        GoogleAccount::find()
            .filter(google_account::Column::GoogleId.eq(subject))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by row id.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<google_account::Model>> {
        GoogleAccount::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new account, or return the existing row for the same subject.
    pub async fn find_or_create(
        &self,
        subject: &str,
        model: google_account::ActiveModel,
    ) -> AppResult<google_account::Model> {
        if let Some(existing) = self.find_by_subject(subject).await? {
            return Ok(existing);
        }

        match model.insert(self.db.as_ref()).await {
            Ok(created) => Ok(created),
            // Lost the insert race; the row now exists.
            Err(e) if is_unique_violation(&e) => self
                .find_by_subject(subject)
                .await?
                .ok_or_else(|| AppError::Database(e.to_string())),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Update an account (profile fields; last write wins).
    pub async fn update(&self, model: google_account::ActiveModel) -> AppResult<google_account::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Kakao account repository for database operations.
#[derive(Clone)]
pub struct KakaoAccountRepository {
    db: Arc<DatabaseConnection>,
}

impl KakaoAccountRepository {
    /// Create a new Kakao account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by Kakao user id.
    pub async fn find_by_subject(&self, subject: &str) -> AppResult<Option<kakao_account::Model>> {
        KakaoAccount::find()
            .filter(kakao_account::Column::KakaoId.eq(subject))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by row id.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<kakao_account::Model>> {
        KakaoAccount::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new account, or return the existing row for the same subject.
    pub async fn find_or_create(
        &self,
        subject: &str,
        model: kakao_account::ActiveModel,
    ) -> AppResult<kakao_account::Model> {
        if let Some(existing) = self.find_by_subject(subject).await? {
            return Ok(existing);
        }

        match model.insert(self.db.as_ref()).await {
            Ok(created) => Ok(created),
            Err(e) if is_unique_violation(&e) => self
                .find_by_subject(subject)
                .await?
                .ok_or_else(|| AppError::Database(e.to_string())),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Update an account (profile fields; last write wins).
    pub async fn update(&self, model: kakao_account::ActiveModel) -> AppResult<kakao_account::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Naver account repository for database operations.
#[derive(Clone)]
pub struct NaverAccountRepository {
    db: Arc<DatabaseConnection>,
}

impl NaverAccountRepository {
    /// Create a new Naver account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by Naver user id.
    pub async fn find_by_subject(&self, subject: &str) -> AppResult<Option<naver_account::Model>> {
        NaverAccount::find()
            .filter(naver_account::Column::NaverId.eq(subject))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by row id.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<naver_account::Model>> {
        NaverAccount::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new account, or return the existing row for the same subject.
    pub async fn find_or_create(
        &self,
        subject: &str,
        model: naver_account::ActiveModel,
    ) -> AppResult<naver_account::Model> {
        if let Some(existing) = self.find_by_subject(subject).await? {
            return Ok(existing);
        }

        match model.insert(self.db.as_ref()).await {
            Ok(created) => Ok(created),
            Err(e) if is_unique_violation(&e) => self
                .find_by_subject(subject)
                .await?
                .ok_or_else(|| AppError::Database(e.to_string())),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Update an account (profile fields; last write wins).
    pub async fn update(&self, model: naver_account::ActiveModel) -> AppResult<naver_account::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
