use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000000_create_accounts::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountIntegrates::Table)
                    .if_not_exists()
                    .col(pk_uuid(AccountIntegrates::Id))
                    .col(uuid(AccountIntegrates::AccountId))
                    .col(string_len(AccountIntegrates::Provider, 16))
                    .col(string(AccountIntegrates::OpenId))
                    .col(text(AccountIntegrates::EncryptedToken).default(""))
                    .col(
                        timestamp_with_time_zone(AccountIntegrates::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(AccountIntegrates::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_integrates_account_id")
                            .from(AccountIntegrates::Table, AccountIntegrates::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One account per external identity
        manager
            .create_index(
                Index::create()
                    .name("idx_account_integrates_provider_open_id")
                    .table(AccountIntegrates::Table)
                    .col(AccountIntegrates::Provider)
                    .col(AccountIntegrates::OpenId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One link per provider per account
        manager
            .create_index(
                Index::create()
                    .name("idx_account_integrates_account_provider")
                    .table(AccountIntegrates::Table)
                    .col(AccountIntegrates::AccountId)
                    .col(AccountIntegrates::Provider)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountIntegrates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AccountIntegrates {
    Table,
    Id,
    AccountId,
    Provider,
    OpenId,
    EncryptedToken,
    CreatedAt,
    UpdatedAt,
}
