//! Student registration endpoints.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use graduon_common::AppResult;
use graduon_core::RegisterStudentInput;
use graduon_db::entities::student;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

/// Student registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentRequest {
    pub student_id: String,
    pub name: String,
}

/// Student response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: i32,
    pub student_id: String,
    pub name: String,
    pub local_email: Option<String>,
    pub google_account_id: Option<i32>,
    pub kakao_account_id: Option<i32>,
    pub naver_account_id: Option<i32>,
    pub created_at: String,
}

impl From<student::Model> for StudentResponse {
    fn from(student: student::Model) -> Self {
        Self {
            id: student.id,
            student_id: student.student_id,
            name: student.name,
            local_email: student.local_email,
            google_account_id: student.google_account_id,
            kakao_account_id: student.kakao_account_id,
            naver_account_id: student.naver_account_id,
            created_at: student.created_at.to_rfc3339(),
        }
    }
}

/// Register the student record owned by the authenticated identity.
async fn register_student(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<RegisterStudentRequest>,
) -> AppResult<ApiResponse<StudentResponse>> {
    let student = state
        .enrollment_service
        .register_student(
            &identity,
            RegisterStudentInput {
                student_id: req.student_id,
                name: req.name,
            },
        )
        .await?;

    Ok(ApiResponse::ok(student.into()))
}

/// Fetch the authenticated identity's student record.
async fn me(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<StudentResponse>> {
    let student = state.enrollment_service.get_student(&identity).await?;
    Ok(ApiResponse::ok(student.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_student))
        .route("/me", get(me))
}
