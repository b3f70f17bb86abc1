//! Create local account table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LocalAccount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LocalAccount::Email)
                            .string_len(320)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LocalAccount::PasswordHash).string_len(256).not_null())
                    .col(
                        ColumnDef::new(LocalAccount::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(LocalAccount::VerificationCode).string_len(6))
                    .col(ColumnDef::new(LocalAccount::CodeCreatedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(LocalAccount::VerificationAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(LocalAccount::LastAttemptAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(LocalAccount::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(LocalAccount::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: is_active (login and resolver always filter on it)
        manager
            .create_index(
                Index::create()
                    .name("idx_local_account_is_active")
                    .table(LocalAccount::Table)
                    .col(LocalAccount::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LocalAccount::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LocalAccount {
    Table,
    Email,
    PasswordHash,
    IsActive,
    VerificationCode,
    CodeCreatedAt,
    VerificationAttempts,
    LastAttemptAt,
    CreatedAt,
    UpdatedAt,
}
