//! Create course record table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CourseRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseRecord::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseRecord::StudentId).integer().not_null())
                    .col(ColumnDef::new(CourseRecord::CourseName).string_len(100).not_null())
                    .col(ColumnDef::new(CourseRecord::Semester).string_len(50).not_null())
                    .col(ColumnDef::new(CourseRecord::Credits).integer().not_null())
                    .col(ColumnDef::new(CourseRecord::Grade).double().not_null())
                    .col(
                        ColumnDef::new(CourseRecord::IsMajor)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CourseRecord::IsRetake)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CourseRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(CourseRecord::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_record_student")
                            .from(CourseRecord::Table, CourseRecord::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: (student, course, retake flag) - one initial attempt and at
        // most one retake per course.
        manager
            .create_index(
                Index::create()
                    .name("uq_course_record_student_course_retake")
                    .table(CourseRecord::Table)
                    .col(CourseRecord::StudentId)
                    .col(CourseRecord::CourseName)
                    .col(CourseRecord::IsRetake)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseRecord::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CourseRecord {
    Table,
    Id,
    StudentId,
    CourseName,
    Semester,
    Credits,
    Grade,
    IsMajor,
    IsRetake,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
}
