//! Naver-linked account entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "naver_account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Naver user id, unique per Naver account.
    #[sea_orm(unique, indexed)]
    pub naver_id: String,

    /// Email address reported by Naver.
    pub email: String,

    /// Display name reported by Naver.
    pub name: String,

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
