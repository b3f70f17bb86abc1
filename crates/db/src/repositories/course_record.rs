//! Course record repository.

use std::sync::Arc;

use crate::entities::{course_record, CourseRecord};
use graduon_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Course record repository for database operations.
#[derive(Clone)]
pub struct CourseRecordRepository {
    db: Arc<DatabaseConnection>,
}

impl CourseRecordRepository {
    /// Create a new course record repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Whether a record exists for the exact (student, course, retake) triple.
    pub async fn exists(
        &self,
        student_id: i32,
        course_name: &str,
        is_retake: bool,
    ) -> AppResult<bool> {
        let found = CourseRecord::find()
            .filter(course_record::Column::StudentId.eq(student_id))
            .filter(course_record::Column::CourseName.eq(course_name))
            .filter(course_record::Column::IsRetake.eq(is_retake))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.is_some())
    }

    /// List all records for a student, oldest first.
    pub async fn list_by_student(&self, student_id: i32) -> AppResult<Vec<course_record::Model>> {
        CourseRecord::find()
            .filter(course_record::Column::StudentId.eq(student_id))
            .order_by_asc(course_record::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new course record.
    pub async fn create(&self, model: course_record::ActiveModel) -> AppResult<course_record::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
