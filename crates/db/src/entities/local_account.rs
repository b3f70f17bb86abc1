//! Local email/password account entity.
//!
//! The five `verification_*`/`code_*` columns form the embedded verification
//! challenge shared between the signup-verification and password-reset flows:
//! issuing a code for either flow increments the same attempt counter, and a
//! successful confirmation of either flow clears all of them at once.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "local_account")]
pub struct Model {
    /// Email address, also the account's identity key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,

    /// Argon2 password hash.
    pub password_hash: String,

    /// False until the email address is verified.
    #[sea_orm(default_value = false)]
    pub is_active: bool,

    /// Outstanding verification code, if a challenge is active.
    #[sea_orm(nullable)]
    pub verification_code: Option<String>,

    /// When the outstanding code was issued.
    #[sea_orm(nullable)]
    pub code_created_at: Option<DateTimeWithTimeZone>,

    /// Issuance attempts since the last successful confirmation.
    #[sea_orm(default_value = 0)]
    pub verification_attempts: i32,

    /// When a code was last issued (basis of the backoff window).
    #[sea_orm(nullable)]
    pub last_attempt_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::student::Entity")]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
