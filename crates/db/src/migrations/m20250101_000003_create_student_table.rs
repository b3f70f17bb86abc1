//! Create student table migration.

use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Student::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Student::StudentId)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Student::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Student::LocalEmail).string_len(320))
                    .col(ColumnDef::new(Student::GoogleAccountId).integer())
                    .col(ColumnDef::new(Student::KakaoAccountId).integer())
                    .col(ColumnDef::new(Student::NaverAccountId).integer())
                    .col(
                        ColumnDef::new(Student::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Student::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_local_email")
                            .from(Student::Table, Student::LocalEmail)
                            .to(LocalAccount::Table, LocalAccount::Email),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_google_account")
                            .from(Student::Table, Student::GoogleAccountId)
                            .to(GoogleAccount::Table, GoogleAccount::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_kakao_account")
                            .from(Student::Table, Student::KakaoAccountId)
                            .to(KakaoAccount::Table, KakaoAccount::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_naver_account")
                            .from(Student::Table, Student::NaverAccountId)
                            .to(NaverAccount::Table, NaverAccount::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Exactly one identity link must be populated.
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE student ADD CONSTRAINT chk_student_single_identity_link CHECK (\
                 (local_email IS NOT NULL)::int + \
                 (google_account_id IS NOT NULL)::int + \
                 (kakao_account_id IS NOT NULL)::int + \
                 (naver_account_id IS NOT NULL)::int = 1)",
            )
            .await?;

        // One student per identity: each link column is unique.
        manager
            .create_index(
                Index::create()
                    .name("idx_student_local_email")
                    .table(Student::Table)
                    .col(Student::LocalEmail)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_student_google_account_id")
                    .table(Student::Table)
                    .col(Student::GoogleAccountId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_student_kakao_account_id")
                    .table(Student::Table)
                    .col(Student::KakaoAccountId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_student_naver_account_id")
                    .table(Student::Table)
                    .col(Student::NaverAccountId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
    StudentId,
    Name,
    LocalEmail,
    GoogleAccountId,
    KakaoAccountId,
    NaverAccountId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum LocalAccount {
    Table,
    Email,
}

#[derive(Iden)]
enum GoogleAccount {
    Table,
    Id,
}

#[derive(Iden)]
enum KakaoAccount {
    Table,
    Id,
}

#[derive(Iden)]
enum NaverAccount {
    Table,
    Id,
}
