//! Course record entity.
//!
//! `(student_id, course_name, is_retake)` is unique: a course can be taken
//! once initially and retaken at most once.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owning student.
    #[sea_orm(indexed)]
    pub student_id: i32,

    /// Course name.
    pub course_name: String,

    /// Semester taken, e.g. "1-2".
    pub semester: String,

    /// Credit count.
    pub credits: i32,

    /// Grade points earned (0.0 - 4.5).
    pub grade: f64,

    /// Whether the course counts toward the major.
    #[sea_orm(default_value = false)]
    pub is_major: bool,

    /// Whether this record is a retake of an earlier attempt.
    #[sea_orm(default_value = false)]
    pub is_retake: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
