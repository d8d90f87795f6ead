//! Create `booking` table with FKs to client, provider and catalog.
//!
//! Catalog rows referenced by a booking cannot be deleted.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::ClientId).not_null())
                    .col(uuid(Booking::ProviderId).not_null())
                    .col(uuid(Booking::CatalogId).not_null())
                    .col(timestamp_with_time_zone(Booking::StartAt).not_null())
                    .col(timestamp_with_time_zone(Booking::EndAt).not_null())
                    .col(string_len(Booking::Status, 16).not_null())
                    .col(ColumnDef::new(Booking::Notes).string_len(500).null())
                    .col(timestamp_with_time_zone(Booking::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Booking::UpdatedAt).not_null())
                    .check(Expr::col(Booking::StartAt).lt(Expr::col(Booking::EndAt)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_client")
                            .from(Booking::Table, Booking::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_provider")
                            .from(Booking::Table, Booking::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_catalog")
                            .from(Booking::Table, Booking::CatalogId)
                            .to(Catalog::Table, Catalog::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Booking { Table, Id, ClientId, ProviderId, CatalogId, StartAt, EndAt, Status, Notes, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Client { Table, Id }

#[derive(DeriveIden)]
enum Provider { Table, Id }

#[derive(DeriveIden)]
enum Catalog { Table, Id }
