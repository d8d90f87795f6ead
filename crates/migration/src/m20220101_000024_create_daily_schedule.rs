//! Create `daily_schedule` and `schedule_interval`.
//!
//! Both cascade from the owning provider so a schedule never outlives it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailySchedule::Table)
                    .if_not_exists()
                    .col(uuid(DailySchedule::Id).primary_key())
                    .col(uuid(DailySchedule::ProviderId).not_null())
                    .col(date(DailySchedule::Date).not_null())
                    .col(timestamp_with_time_zone(DailySchedule::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_schedule_provider")
                            .from(DailySchedule::Table, DailySchedule::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ScheduleInterval::Table)
                    .if_not_exists()
                    .col(uuid(ScheduleInterval::Id).primary_key())
                    .col(uuid(ScheduleInterval::ScheduleId).not_null())
                    .col(time(ScheduleInterval::StartTime).not_null())
                    .col(time(ScheduleInterval::EndTime).not_null())
                    .check(Expr::col(ScheduleInterval::StartTime).lt(Expr::col(ScheduleInterval::EndTime)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_interval_schedule")
                            .from(ScheduleInterval::Table, ScheduleInterval::ScheduleId)
                            .to(DailySchedule::Table, DailySchedule::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ScheduleInterval::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(DailySchedule::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum DailySchedule { Table, Id, ProviderId, Date, CreatedAt }

#[derive(DeriveIden)]
enum ScheduleInterval { Table, Id, ScheduleId, StartTime, EndTime }

#[derive(DeriveIden)]
enum Provider { Table, Id }
