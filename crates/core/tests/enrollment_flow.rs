//! End-to-end enrollment invariant tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test enrollment_flow -- --ignored`

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use graduon_common::AppError;
use graduon_core::{AddCourseInput, EnrollmentService, Identity, RegisterStudentInput};
use graduon_db::entities::local_account;
use graduon_db::repositories::{
    CourseRecordRepository, GoogleAccountRepository, KakaoAccountRepository,
    LocalAccountRepository, NaverAccountRepository, StudentRepository,
};
use graduon_db::test_utils::TestDatabase;
use sea_orm::Set;

async fn seed_local_account(accounts: &LocalAccountRepository, email: &str) {
    let model = local_account::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set("$argon2id$dummy".to_string()),
        is_active: Set(true),
        verification_attempts: Set(0),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    accounts.create(model).await.unwrap();
}

fn course(name: &str, semester: &str, grade: f64, is_retake: bool) -> AddCourseInput {
    AddCourseInput {
        course_name: name.to_string(),
        semester: semester.to_string(),
        credits: 3,
        grade,
        is_major: true,
        is_retake,
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_enrollment_invariants_end_to_end() {
    let db = TestDatabase::create_unique().await.unwrap();
    graduon_db::migrate(db.connection()).await.unwrap();
    let conn = Arc::new(sea_orm::Database::connect(db.config.database_url()).await.unwrap());

    let accounts = LocalAccountRepository::new(Arc::clone(&conn));
    let service = EnrollmentService::new(
        StudentRepository::new(Arc::clone(&conn)),
        CourseRecordRepository::new(Arc::clone(&conn)),
        GoogleAccountRepository::new(Arc::clone(&conn)),
        KakaoAccountRepository::new(Arc::clone(&conn)),
        NaverAccountRepository::new(Arc::clone(&conn)),
    );

    seed_local_account(&accounts, "alice@example.com").await;
    seed_local_account(&accounts, "bob@example.com").await;

    let alice = Identity::Local {
        email: "alice@example.com".to_string(),
    };
    let bob = Identity::Local {
        email: "bob@example.com".to_string(),
    };

    // Registration succeeds once per identity.
    let student = service
        .register_student(
            &alice,
            RegisterStudentInput {
                student_id: "20251234".to_string(),
                name: "Alice".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(student.local_email.as_deref(), Some("alice@example.com"));

    let result = service
        .register_student(
            &alice,
            RegisterStudentInput {
                student_id: "20259999".to_string(),
                name: "Alice".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::AlreadyRegistered(_))));

    // The student number is globally unique across identities.
    let result = service
        .register_student(
            &bob,
            RegisterStudentInput {
                student_id: "20251234".to_string(),
                name: "Bob".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::AlreadyRegistered(_))));

    // Retake before any initial attempt is rejected.
    let result = service.add_course(&alice, course("Calculus", "1-2", 3.0, true)).await;
    assert!(matches!(result, Err(AppError::RetakePreconditionMissing(_))));

    // Initial attempt, then a retake, both succeed.
    service
        .add_course(&alice, course("Calculus", "1-1", 1.5, false))
        .await
        .unwrap();
    service
        .add_course(&alice, course("Calculus", "1-2", 4.0, true))
        .await
        .unwrap();

    // A second initial attempt and a second retake are both duplicates.
    let result = service.add_course(&alice, course("Calculus", "2-1", 2.0, false)).await;
    assert!(matches!(result, Err(AppError::DuplicateEnrollment(_))));

    let result = service.add_course(&alice, course("Calculus", "2-1", 2.0, true)).await;
    assert!(matches!(result, Err(AppError::DuplicateEnrollment(_))));

    // The summary counts the course once, with the retake's grade.
    let summary = service.grade_summary(&alice).await.unwrap();
    assert_eq!(summary.total_credits, 3);
    assert_eq!(summary.major_credits, 3);
    assert!((summary.gpa - 4.0).abs() < 1e-9);

    db.drop_database().await.unwrap();
}
