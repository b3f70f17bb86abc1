//! Create the three OAuth provider account tables.
//!
//! One table per provider; the provider subject id is unique in each, which
//! is what makes duplicate-callback races converge on a single row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create google_account table
        manager
            .create_table(
                Table::create()
                    .table(GoogleAccount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GoogleAccount::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GoogleAccount::GoogleId)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(GoogleAccount::Email).string_len(320).not_null())
                    .col(ColumnDef::new(GoogleAccount::Name).string_len(256).not_null())
                    .col(ColumnDef::new(GoogleAccount::Picture).string_len(1024))
                    .col(
                        ColumnDef::new(GoogleAccount::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GoogleAccount::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(GoogleAccount::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Create kakao_account table (Kakao shares no email address)
        manager
            .create_table(
                Table::create()
                    .table(KakaoAccount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KakaoAccount::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(KakaoAccount::KakaoId)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(KakaoAccount::Nickname).string_len(256))
                    .col(ColumnDef::new(KakaoAccount::Picture).string_len(1024))
                    .col(
                        ColumnDef::new(KakaoAccount::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(KakaoAccount::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(KakaoAccount::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Create naver_account table
        manager
            .create_table(
                Table::create()
                    .table(NaverAccount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NaverAccount::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NaverAccount::NaverId)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(NaverAccount::Email).string_len(320).not_null())
                    .col(ColumnDef::new(NaverAccount::Name).string_len(256).not_null())
                    .col(ColumnDef::new(NaverAccount::Picture).string_len(1024))
                    .col(
                        ColumnDef::new(NaverAccount::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(NaverAccount::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(NaverAccount::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NaverAccount::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(KakaoAccount::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GoogleAccount::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GoogleAccount {
    Table,
    Id,
    GoogleId,
    Email,
    Name,
    Picture,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum KakaoAccount {
    Table,
    Id,
    KakaoId,
    Nickname,
    Picture,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum NaverAccount {
    Table,
    Id,
    NaverId,
    Email,
    Name,
    Picture,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
