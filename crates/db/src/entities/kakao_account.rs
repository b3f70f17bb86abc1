//! Kakao-linked account entity.
//!
//! Kakao does not share an email address, so only the nickname and profile
//! image are stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kakao_account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Kakao user id, unique per Kakao account.
    #[sea_orm(unique, indexed)]
    pub kakao_id: String,

    /// Nickname from the Kakao profile.
    #[sea_orm(nullable)]
    pub nickname: Option<String>,

    /// Profile picture URL.
    #[sea_orm(nullable)]
    pub picture: Option<String>,

    /// Always true once created; no deactivation path exists.
    #[sea_orm(default_value = true)]
    pub is_active: bool,

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
