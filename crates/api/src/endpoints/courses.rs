//! Course record endpoints.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use graduon_common::AppResult;
use graduon_core::{AddCourseInput, GradeSummary};
use graduon_db::entities::course_record;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

/// Course creation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCourseRequest {
    pub course_name: String,
    pub semester: String,
    pub credits: i32,
    pub grade: f64,
    #[serde(default)]
    pub is_major: bool,
    #[serde(default)]
    pub is_retake: bool,
}

/// Course record response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: i32,
    pub student_id: i32,
    pub course_name: String,
    pub semester: String,
    pub credits: i32,
    pub grade: f64,
    pub is_major: bool,
    pub is_retake: bool,
    pub created_at: String,
}

impl From<course_record::Model> for CourseResponse {
    fn from(record: course_record::Model) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id,
            course_name: record.course_name,
            semester: record.semester,
            credits: record.credits,
            grade: record.grade,
            is_major: record.is_major,
            is_retake: record.is_retake,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Record a course for the authenticated identity's student.
async fn add_course(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<AddCourseRequest>,
) -> AppResult<ApiResponse<CourseResponse>> {
    let record = state
        .enrollment_service
        .add_course(
            &identity,
            AddCourseInput {
                course_name: req.course_name,
                semester: req.semester,
                credits: req.credits,
                grade: req.grade,
                is_major: req.is_major,
                is_retake: req.is_retake,
            },
        )
        .await?;

    Ok(ApiResponse::ok(record.into()))
}

/// List all course records for the authenticated identity's student.
async fn list_courses(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CourseResponse>>> {
    let records = state.enrollment_service.list_courses(&identity).await?;
    Ok(ApiResponse::ok(
        records.into_iter().map(Into::into).collect(),
    ))
}

/// Summarize earned credits and GPA.
async fn summary(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<GradeSummary>> {
    let summary = state.enrollment_service.grade_summary(&identity).await?;
    Ok(ApiResponse::ok(summary))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add_course).get(list_courses))
        .route("/summary", get(summary))
}
