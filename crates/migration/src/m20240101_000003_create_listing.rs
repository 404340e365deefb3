//! Create `listing` table with FK to `user`.
//!
//! Media references and social links are JSONB; moderation status and
//! priority are stored as short strings validated by the service layer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listing::Table)
                    .if_not_exists()
                    .col(uuid(Listing::Id).primary_key())
                    .col(uuid(Listing::OwnerId).not_null())
                    .col(string_len(Listing::BusinessName, 255).not_null())
                    .col(string_len(Listing::ContactName, 128).not_null())
                    .col(string_len(Listing::Email, 255).not_null())
                    .col(string_len(Listing::Phone, 64).not_null())
                    .col(string_len(Listing::Industry, 128).not_null())
                    .col(string_len(Listing::MembershipCategory, 32).not_null())
                    .col(ColumnDef::new(Listing::Description).text().null())
                    .col(ColumnDef::new(Listing::WebsiteUrl).string_len(255).null())
                    .col(json_binary(Listing::SocialLinks).not_null())
                    .col(json_binary(Listing::Images).not_null())
                    .col(json_binary(Listing::Videos).not_null())
                    .col(string_len(Listing::Status, 32).not_null())
                    .col(string_len(Listing::Priority, 32).not_null())
                    .col(ColumnDef::new(Listing::ReviewNotes).text().null())
                    // Set exactly when status becomes approved, null otherwise
                    .col(
                        ColumnDef::new(Listing::ApprovedDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Listing::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Listing::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_owner")
                            .from(Listing::Table, Listing::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Listing::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Listing {
    Table,
    Id,
    OwnerId,
    BusinessName,
    ContactName,
    Email,
    Phone,
    Industry,
    MembershipCategory,
    Description,
    WebsiteUrl,
    SocialLinks,
    Images,
    Videos,
    Status,
    Priority,
    ReviewNotes,
    ApprovedDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
