//! Create `catalog` table.
//!
//! Bookable offerings; price is stored in cents.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Catalog::Table)
                    .if_not_exists()
                    .col(uuid(Catalog::Id).primary_key())
                    .col(string_len(Catalog::Name, 128).not_null())
                    .col(integer(Catalog::StandardDurationMinutes).not_null().check(Expr::col(Catalog::StandardDurationMinutes).gt(1)))
                    .col(big_integer(Catalog::Price).not_null().check(Expr::col(Catalog::Price).gte(0)))
                    .col(string_len(Catalog::Category, 64).not_null())
                    .col(ColumnDef::new(Catalog::ImageUrl).string_len(512).null())
                    .col(timestamp_with_time_zone(Catalog::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Catalog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Catalog { Table, Id, Name, StandardDurationMinutes, Price, Category, ImageUrl, CreatedAt }
