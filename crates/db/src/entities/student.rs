//! Student entity.
//!
//! A student belongs to exactly one authenticated identity: precisely one of
//! the four link columns is non-null, checked by the enrollment service on
//! creation and backed by a CHECK constraint in the migration. The link is
//! never changed afterwards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Human-assigned student number, globally unique.
    #[sea_orm(unique, indexed)]
    pub student_id: String,

    /// Display name.
    pub name: String,

    /// Link to a local email/password account.
    #[sea_orm(nullable)]
    pub local_email: Option<String>,

    /// Link to a Google-linked account.
    #[sea_orm(nullable)]
    pub google_account_id: Option<i32>,

    /// Link to a Kakao-linked account.
    #[sea_orm(nullable)]
    pub kakao_account_id: Option<i32>,

    /// Link to a Naver-linked account.
    #[sea_orm(nullable)]
    pub naver_account_id: Option<i32>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::local_account::Entity",
        from = "Column::LocalEmail",
        to = "super::local_account::Column::Email"
    )]
    LocalAccount,

    #[sea_orm(
        belongs_to = "super::google_account::Entity",
        from = "Column::GoogleAccountId",
        to = "super::google_account::Column::Id"
    )]
    GoogleAccount,

    #[sea_orm(
        belongs_to = "super::kakao_account::Entity",
        from = "Column::KakaoAccountId",
        to = "super::kakao_account::Column::Id"
    )]
    KakaoAccount,

    #[sea_orm(
        belongs_to = "super::naver_account::Entity",
        from = "Column::NaverAccountId",
        to = "super::naver_account::Column::Id"
    )]
    NaverAccount,

    #[sea_orm(has_many = "super::course_record::Entity")]
    CourseRecord,
}

impl Related<super::local_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocalAccount.def()
    }
}

impl Related<super::google_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoogleAccount.def()
    }
}

impl Related<super::kakao_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::KakaoAccount.def()
    }
}

impl Related<super::naver_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NaverAccount.def()
    }
}

impl Related<super::course_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
