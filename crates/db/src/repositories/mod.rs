//! Database repositories.

mod course_record;
mod local_account;
mod provider_account;
mod student;

pub use course_record::CourseRecordRepository;
pub use local_account::LocalAccountRepository;
pub use provider_account::{
    GoogleAccountRepository, KakaoAccountRepository, NaverAccountRepository,
};
pub use student::StudentRepository;
