//! Student repository.

use std::sync::Arc;

use crate::entities::{student, Student};
use graduon_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Student repository for database operations.
#[derive(Clone)]
pub struct StudentRepository {
    db: Arc<DatabaseConnection>,
}

impl StudentRepository {
    /// Create a new student repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a student by row id.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<student::Model>> {
        Student::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a student by the human-assigned student number.
    pub async fn find_by_student_id(&self, student_id: &str) -> AppResult<Option<student::Model>> {
        Student::find()
            .filter(student::Column::StudentId.eq(student_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the student linked to a local account.
    pub async fn find_by_local_email(&self, email: &str) -> AppResult<Option<student::Model>> {
        Student::find()
            .filter(student::Column::LocalEmail.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the student linked to a Google account.
    pub async fn find_by_google_account(&self, account_id: i32) -> AppResult<Option<student::Model>> {
        Student::find()
            .filter(student::Column::GoogleAccountId.eq(account_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the student linked to a Kakao account.
    pub async fn find_by_kakao_account(&self, account_id: i32) -> AppResult<Option<student::Model>> {
        Student::find()
            .filter(student::Column::KakaoAccountId.eq(account_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the student linked to a Naver account.
    pub async fn find_by_naver_account(&self, account_id: i32) -> AppResult<Option<student::Model>> {
        Student::find()
            .filter(student::Column::NaverAccountId.eq(account_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new student.
    pub async fn create(&self, model: student::ActiveModel) -> AppResult<student::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
