//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20220101_000021_create_catalog;
mod m20220101_000022_create_client;
mod m20220101_000023_create_provider;
mod m20220101_000024_create_daily_schedule;
mod m20220101_000025_create_booking;
mod m20220101_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20220101_000021_create_catalog::Migration),
            Box::new(m20220101_000022_create_client::Migration),
            Box::new(m20220101_000023_create_provider::Migration),
            Box::new(m20220101_000024_create_daily_schedule::Migration),
            Box::new(m20220101_000025_create_booking::Migration),
            // Indexes should always be applied last
            Box::new(m20220101_000002_add_indexes::Migration),
        ]
    }
}
