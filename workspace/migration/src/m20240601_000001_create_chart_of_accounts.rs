use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create account_types table
        manager
            .create_table(
                Table::create()
                    .table(AccountTypes::Table)
                    .if_not_exists()
                    .col(pk_auto(AccountTypes::Id))
                    .col(string_len(AccountTypes::Name, 50).unique_key())
                    .col(string_len_null(AccountTypes::Description, 250))
                    .col(timestamp_with_time_zone(AccountTypes::CreatedAt))
                    .col(timestamp_with_time_zone_null(AccountTypes::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string(Accounts::Code).unique_key())
                    .col(string_len(Accounts::Name, 100))
                    .col(string_len_null(Accounts::Description, 250))
                    .col(boolean(Accounts::CanHaveEntries).default(false))
                    .col(integer_null(Accounts::ParentId))
                    .col(integer(Accounts::AccountTypeId))
                    .col(timestamp_with_time_zone(Accounts::CreatedAt))
                    .col(timestamp_with_time_zone_null(Accounts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_parent")
                            .from(Accounts::Table, Accounts::ParentId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_account_type")
                            .from(Accounts::Table, Accounts::AccountTypeId)
                            .to(AccountTypes::Table, AccountTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_parent_id")
                    .table(Accounts::Table)
                    .col(Accounts::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AccountTypes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AccountTypes {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Code,
    Name,
    Description,
    CanHaveEntries,
    ParentId,
    AccountTypeId,
    CreatedAt,
    UpdatedAt,
}
