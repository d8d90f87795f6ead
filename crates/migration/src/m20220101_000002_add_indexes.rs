use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // DailySchedule: at most one per provider and date
        manager
            .create_index(
                Index::create()
                    .name("uniq_daily_schedule_provider_date")
                    .table(DailySchedule::Table)
                    .col(DailySchedule::ProviderId)
                    .col(DailySchedule::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_interval_schedule")
                    .table(ScheduleInterval::Table)
                    .col(ScheduleInterval::ScheduleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_provider_catalog_catalog")
                    .table(ProviderCatalog::Table)
                    .col(ProviderCatalog::CatalogId)
                    .to_owned(),
            )
            .await?;

        // Booking: overlap lookups are scoped by provider or client and ordered by start
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_provider_start")
                    .table(Booking::Table)
                    .col(Booking::ProviderId)
                    .col(Booking::StartAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_client_start")
                    .table(Booking::Table)
                    .col(Booking::ClientId)
                    .col(Booking::StartAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_daily_schedule_provider_date").table(DailySchedule::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_schedule_interval_schedule").table(ScheduleInterval::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_provider_catalog_catalog").table(ProviderCatalog::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_provider_start").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_client_start").table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DailySchedule { Table, ProviderId, Date }

#[derive(DeriveIden)]
enum ScheduleInterval { Table, ScheduleId }

#[derive(DeriveIden)]
enum ProviderCatalog { Table, CatalogId }

#[derive(DeriveIden)]
enum Booking { Table, ProviderId, ClientId, StartAt }
