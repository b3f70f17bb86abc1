//! Student registration and course enrollment invariants.
//!
//! Two rules are enforced here on top of the schema constraints:
//!
//! - a Student belongs to exactly one identity, and an identity owns at most
//!   one Student;
//! - per (student, course) there is at most one initial record and at most
//!   one retake, and a retake requires the initial record to exist.

use chrono::Utc;
use graduon_common::{AppError, AppResult};
use graduon_db::{
    entities::{course_record, student},
    repositories::{
        CourseRecordRepository, GoogleAccountRepository, KakaoAccountRepository,
        NaverAccountRepository, StudentRepository,
    },
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::identity::Identity;

/// Enrollment service scoped to resolved identities.
#[derive(Clone)]
pub struct EnrollmentService {
    students: StudentRepository,
    courses: CourseRecordRepository,
    google_accounts: GoogleAccountRepository,
    kakao_accounts: KakaoAccountRepository,
    naver_accounts: NaverAccountRepository,
}

/// Input for registering a student.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterStudentInput {
    /// Human-assigned student number.
    #[validate(length(min = 1, max = 20))]
    pub student_id: String,

    /// Display name.
    #[validate(length(min = 1, max = 50))]
    pub name: String,
}

/// Input for recording a course.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCourseInput {
    /// Course name.
    #[validate(length(min = 1, max = 100))]
    pub course_name: String,

    /// Semester taken, e.g. "1-2".
    #[validate(length(min = 1, max = 50))]
    pub semester: String,

    /// Credit count.
    #[validate(range(min = 1, max = 10))]
    pub credits: i32,

    /// Grade points earned.
    #[validate(range(min = 0.0, max = 4.5))]
    pub grade: f64,

    /// Whether the course counts toward the major.
    #[serde(default)]
    pub is_major: bool,

    /// Whether this is a retake of an earlier attempt.
    #[serde(default)]
    pub is_retake: bool,
}

/// Aggregate view over a student's course records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSummary {
    /// Credits earned, counting each course once.
    pub total_credits: i32,
    /// Credits earned in major courses.
    pub major_credits: i32,
    /// Credit-weighted grade point average.
    pub gpa: f64,
}

impl EnrollmentService {
    /// Create a new enrollment service.
    #[must_use]
    pub const fn new(
        students: StudentRepository,
        courses: CourseRecordRepository,
        google_accounts: GoogleAccountRepository,
        kakao_accounts: KakaoAccountRepository,
        naver_accounts: NaverAccountRepository,
    ) -> Self {
        Self {
            students,
            courses,
            google_accounts,
            kakao_accounts,
            naver_accounts,
        }
    }

    /// Register a student owned by the resolved identity.
    pub async fn register_student(
        &self,
        identity: &Identity,
        input: RegisterStudentInput,
    ) -> AppResult<student::Model> {
        input.validate()?;

        // One student per identity.
        if self.find_owned_student(identity).await?.is_some() {
            return Err(AppError::AlreadyRegistered(
                "a student record already exists for this identity".to_string(),
            ));
        }

        // Student numbers are globally unique, across all identities.
        if self
            .students
            .find_by_student_id(&input.student_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyRegistered(format!(
                "student id {} is already taken",
                input.student_id
            )));
        }

        let mut model = student::ActiveModel {
            student_id: Set(input.student_id),
            name: Set(input.name),
            local_email: Set(None),
            google_account_id: Set(None),
            kakao_account_id: Set(None),
            naver_account_id: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            ..Default::default()
        };

        // Exactly one link column is populated, per the identity's tag.
        match identity {
            Identity::Local { email } => {
                model.local_email = Set(Some(email.clone()));
            }
            Identity::Google { subject } => {
                let account = self.resolve_google(subject).await?;
                model.google_account_id = Set(Some(account));
            }
            Identity::Kakao { subject } => {
                let account = self.resolve_kakao(subject).await?;
                model.kakao_account_id = Set(Some(account));
            }
            Identity::Naver { subject } => {
                let account = self.resolve_naver(subject).await?;
                model.naver_account_id = Set(Some(account));
            }
        }

        let created = self.students.create(model).await?;

        tracing::info!(
            student_id = %created.student_id,
            scheme = %identity.scheme(),
            "Student registered"
        );

        Ok(created)
    }

    /// Get the student owned by the resolved identity.
    pub async fn get_student(&self, identity: &Identity) -> AppResult<student::Model> {
        self.find_owned_student(identity)
            .await?
            .ok_or(AppError::NotRegistered)
    }

    /// Record a course for the identity's student.
    ///
    /// The retake-precondition check runs before the duplicate check: a
    /// second retake must be reported as a duplicate retake, not as a
    /// missing precondition.
    pub async fn add_course(
        &self,
        identity: &Identity,
        input: AddCourseInput,
    ) -> AppResult<course_record::Model> {
        input.validate()?;

        let student = self.get_student(identity).await?;

        if input.is_retake
            && !self
                .courses
                .exists(student.id, &input.course_name, false)
                .await?
        {
            return Err(AppError::RetakePreconditionMissing(input.course_name));
        }

        if self
            .courses
            .exists(student.id, &input.course_name, input.is_retake)
            .await?
        {
            let kind = if input.is_retake { "retake" } else { "initial attempt" };
            return Err(AppError::DuplicateEnrollment(format!(
                "{kind} of {} is already recorded",
                input.course_name
            )));
        }

        let model = course_record::ActiveModel {
            student_id: Set(student.id),
            course_name: Set(input.course_name),
            semester: Set(input.semester),
            credits: Set(input.credits),
            grade: Set(input.grade),
            is_major: Set(input.is_major),
            is_retake: Set(input.is_retake),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            ..Default::default()
        };

        self.courses.create(model).await
    }

    /// List all course records for the identity's student.
    pub async fn list_courses(&self, identity: &Identity) -> AppResult<Vec<course_record::Model>> {
        let student = self.get_student(identity).await?;
        self.courses.list_by_student(student.id).await
    }

    /// Summarize earned credits and GPA for the identity's student.
    pub async fn grade_summary(&self, identity: &Identity) -> AppResult<GradeSummary> {
        let records = self.list_courses(identity).await?;
        Ok(summarize(&records))
    }

    async fn find_owned_student(&self, identity: &Identity) -> AppResult<Option<student::Model>> {
        match identity {
            Identity::Local { email } => self.students.find_by_local_email(email).await,
            Identity::Google { subject } => {
                let account = self.resolve_google(subject).await?;
                self.students.find_by_google_account(account).await
            }
            Identity::Kakao { subject } => {
                let account = self.resolve_kakao(subject).await?;
                self.students.find_by_kakao_account(account).await
            }
            Identity::Naver { subject } => {
                let account = self.resolve_naver(subject).await?;
                self.students.find_by_naver_account(account).await
            }
        }
    }

    async fn resolve_google(&self, subject: &str) -> AppResult<i32> {
        self.google_accounts
            .find_by_subject(subject)
            .await?
            .map(|a| a.id)
            .ok_or(AppError::AccountNotFound)
    }

    async fn resolve_kakao(&self, subject: &str) -> AppResult<i32> {
        self.kakao_accounts
            .find_by_subject(subject)
            .await?
            .map(|a| a.id)
            .ok_or(AppError::AccountNotFound)
    }

    async fn resolve_naver(&self, subject: &str) -> AppResult<i32> {
        self.naver_accounts
            .find_by_subject(subject)
            .await?
            .map(|a| a.id)
            .ok_or(AppError::AccountNotFound)
    }
}

/// Fold course records into the summary.
///
/// A retake supersedes the initial attempt of the same course: the course's
/// credits are counted once and the retake's grade replaces the original.
fn summarize(records: &[course_record::Model]) -> GradeSummary {
    use std::collections::HashMap;

    let mut chosen: HashMap<&str, &course_record::Model> = HashMap::new();
    for record in records {
        match chosen.entry(record.course_name.as_str()) {
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(record);
            }
            std::collections::hash_map::Entry::Occupied(mut e) => {
                if record.is_retake {
                    e.insert(record);
                }
            }
        }
    }

    let mut total_credits = 0;
    let mut major_credits = 0;
    let mut weighted = 0.0;
    for record in chosen.values() {
        total_credits += record.credits;
        if record.is_major {
            major_credits += record.credits;
        }
        weighted += record.grade * f64::from(record.credits);
    }

    let gpa = if total_credits > 0 {
        weighted / f64::from(total_credits)
    } else {
        0.0
    };

    GradeSummary {
        total_credits,
        major_credits,
        gpa,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn student_row(id: i32, student_id: &str) -> student::Model {
        student::Model {
            id,
            student_id: student_id.to_string(),
            name: "Alice".to_string(),
            local_email: Some("alice@example.com".to_string()),
            google_account_id: None,
            kakao_account_id: None,
            naver_account_id: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn course_row(student_id: i32, name: &str, credits: i32, grade: f64, is_major: bool, is_retake: bool) -> course_record::Model {
        course_record::Model {
            id: 0,
            student_id,
            course_name: name.to_string(),
            semester: "1-1".to_string(),
            credits,
            grade,
            is_major,
            is_retake,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn local_identity() -> Identity {
        Identity::Local {
            email: "alice@example.com".to_string(),
        }
    }

    fn service(
        student_db: Arc<DatabaseConnection>,
        course_db: Arc<DatabaseConnection>,
    ) -> EnrollmentService {
        EnrollmentService::new(
            StudentRepository::new(student_db),
            CourseRecordRepository::new(course_db),
            GoogleAccountRepository::new(empty_db()),
            KakaoAccountRepository::new(empty_db()),
            NaverAccountRepository::new(empty_db()),
        )
    }

    // === Summary arithmetic ===

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_credits, 0);
        assert_eq!(summary.major_credits, 0);
        assert_eq!(summary.gpa, 0.0);
    }

    #[test]
    fn test_summarize_weighted_gpa() {
        let records = vec![
            course_row(1, "Calculus", 3, 4.0, true, false),
            course_row(1, "Writing", 2, 3.0, false, false),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_credits, 5);
        assert_eq!(summary.major_credits, 3);
        // (3*4.0 + 2*3.0) / 5
        assert!((summary.gpa - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_retake_supersedes_initial() {
        let records = vec![
            course_row(1, "Calculus", 3, 1.0, true, false),
            course_row(1, "Calculus", 3, 4.0, true, true),
        ];
        let summary = summarize(&records);
        // Credits counted once, retake grade wins.
        assert_eq!(summary.total_credits, 3);
        assert!((summary.gpa - 4.0).abs() < 1e-9);
    }

    // === Student registration ===

    #[tokio::test]
    async fn test_register_identity_already_owns_student() {
        let student_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[student_row(1, "20251234")]])
                .into_connection(),
        );
        let service = service(student_db, empty_db());

        let result = service
            .register_student(
                &local_identity(),
                RegisterStudentInput {
                    student_id: "20259999".to_string(),
                    name: "Alice".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::AlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn test_register_student_id_taken() {
        // First lookup (by identity link) is empty; second (by student id)
        // finds someone else's record.
        let student_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    Vec::<student::Model>::new(),
                    vec![student_row(7, "20251234")],
                ])
                .into_connection(),
        );
        let service = service(student_db, empty_db());

        let result = service
            .register_student(
                &local_identity(),
                RegisterStudentInput {
                    student_id: "20251234".to_string(),
                    name: "Alice".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::AlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn test_register_provider_identity_requires_account() {
        let service = EnrollmentService::new(
            StudentRepository::new(empty_db()),
            CourseRecordRepository::new(empty_db()),
            GoogleAccountRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([Vec::<graduon_db::entities::google_account::Model>::new()])
                    .into_connection(),
            )),
            KakaoAccountRepository::new(empty_db()),
            NaverAccountRepository::new(empty_db()),
        );

        let result = service
            .register_student(
                &Identity::Google {
                    subject: "g-unknown".to_string(),
                },
                RegisterStudentInput {
                    student_id: "20251234".to_string(),
                    name: "Alice".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::AccountNotFound)));
    }

    // === Course invariants ===

    #[tokio::test]
    async fn test_add_course_not_registered() {
        let student_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<student::Model>::new()])
                .into_connection(),
        );
        let service = service(student_db, empty_db());

        let result = service
            .add_course(
                &local_identity(),
                AddCourseInput {
                    course_name: "Calculus".to_string(),
                    semester: "1-1".to_string(),
                    credits: 3,
                    grade: 4.0,
                    is_major: true,
                    is_retake: false,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotRegistered)));
    }

    #[tokio::test]
    async fn test_add_retake_without_initial() {
        let student_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[student_row(1, "20251234")]])
                .into_connection(),
        );
        // The initial-attempt existence check comes back empty.
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<course_record::Model>::new()])
                .into_connection(),
        );
        let service = service(student_db, course_db);

        let result = service
            .add_course(
                &local_identity(),
                AddCourseInput {
                    course_name: "Calculus".to_string(),
                    semester: "1-2".to_string(),
                    credits: 3,
                    grade: 3.0,
                    is_major: true,
                    is_retake: true,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::RetakePreconditionMissing(_))));
    }

    #[tokio::test]
    async fn test_add_duplicate_initial() {
        let student_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[student_row(1, "20251234")]])
                .into_connection(),
        );
        // The exact-triple duplicate check finds an existing record.
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[course_row(1, "Calculus", 3, 4.0, true, false)]])
                .into_connection(),
        );
        let service = service(student_db, course_db);

        let result = service
            .add_course(
                &local_identity(),
                AddCourseInput {
                    course_name: "Calculus".to_string(),
                    semester: "1-1".to_string(),
                    credits: 3,
                    grade: 4.0,
                    is_major: true,
                    is_retake: false,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::DuplicateEnrollment(_))));
    }

    #[tokio::test]
    async fn test_add_second_retake_is_duplicate() {
        let student_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[student_row(1, "20251234")]])
                .into_connection(),
        );
        // Initial attempt exists, and so does a retake: the retake
        // precondition passes, then the duplicate check fires.
        let course_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![course_row(1, "Calculus", 3, 1.0, true, false)],
                    vec![course_row(1, "Calculus", 3, 3.0, true, true)],
                ])
                .into_connection(),
        );
        let service = service(student_db, course_db);

        let result = service
            .add_course(
                &local_identity(),
                AddCourseInput {
                    course_name: "Calculus".to_string(),
                    semester: "2-1".to_string(),
                    credits: 3,
                    grade: 4.0,
                    is_major: true,
                    is_retake: true,
                },
            )
            .await;

        match result {
            Err(AppError::DuplicateEnrollment(msg)) => {
                assert!(msg.contains("retake"), "message should name the retake: {msg}");
            }
            other => panic!("Expected DuplicateEnrollment, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_grade_validation_bounds() {
        let input = AddCourseInput {
            course_name: "Calculus".to_string(),
            semester: "1-1".to_string(),
            credits: 3,
            grade: 5.0,
            is_major: false,
            is_retake: false,
        };
        assert!(input.validate().is_err());

        let input = AddCourseInput {
            credits: 0,
            grade: 4.0,
            ..input
        };
        assert!(input.validate().is_err());
    }
}
