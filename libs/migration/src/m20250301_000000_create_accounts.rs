use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_uuid(Accounts::Id))
                    .col(string(Accounts::Email).unique_key())
                    .col(string(Accounts::Name))
                    // External-auth-only accounts never get one
                    .col(string_null(Accounts::Password))
                    .col(string_len(Accounts::Status, 16).default("active"))
                    .col(string_len(Accounts::InterfaceLanguage, 16).default("en-US"))
                    .col(timestamp_with_time_zone_null(Accounts::InitializedAt))
                    .col(timestamp_with_time_zone_null(Accounts::LastLoginAt))
                    .col(string_len_null(Accounts::LastLoginIp, 255))
                    .col(
                        timestamp_with_time_zone(Accounts::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Accounts::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_status")
                    .table(Accounts::Table)
                    .col(Accounts::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Accounts {
    Table,
    Id,
    Email,
    Name,
    Password,
    Status,
    InterfaceLanguage,
    InitializedAt,
    LastLoginAt,
    LastLoginIp,
    CreatedAt,
    UpdatedAt,
}
