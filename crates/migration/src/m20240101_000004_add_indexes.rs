use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing: index on owner_id for member views
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_owner")
                    .table(Listing::Table)
                    .col(Listing::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Listing: index on status for moderation queues and statistics
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_status")
                    .table(Listing::Table)
                    .col(Listing::Status)
                    .to_owned(),
            )
            .await?;

        // Listing: index on industry for the category directory
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_industry")
                    .table(Listing::Table)
                    .col(Listing::Industry)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_listing_owner").table(Listing::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_listing_status").table(Listing::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_listing_industry").table(Listing::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Listing { Table, OwnerId, Status, Industry }
