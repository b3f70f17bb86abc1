//! Database entities.

#![allow(missing_docs)]

pub mod course_record;
pub mod google_account;
pub mod kakao_account;
pub mod local_account;
pub mod naver_account;
pub mod student;

pub use course_record::Entity as CourseRecord;
pub use google_account::Entity as GoogleAccount;
pub use kakao_account::Entity as KakaoAccount;
pub use local_account::Entity as LocalAccount;
pub use naver_account::Entity as NaverAccount;
pub use student::Entity as Student;
