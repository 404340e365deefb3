//! Create `user` table.
//!
//! Holds directory accounts; `is_admin` is fixed at creation time.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Email, 255).unique_key().not_null())
                    .col(string_len(User::Name, 128).not_null())
                    .col(boolean(User::IsAdmin).not_null())
                    // Business profile fields are optional at registration
                    .col(
                        ColumnDef::new(User::BusinessName)
                            .string_len(255)
                            .null(),
                    )
                    .col(ColumnDef::new(User::Phone).string_len(64).null())
                    .col(ColumnDef::new(User::Address).string_len(255).null())
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(User::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User { Table, Id, Email, Name, IsAdmin, BusinessName, Phone, Address, CreatedAt, UpdatedAt }
