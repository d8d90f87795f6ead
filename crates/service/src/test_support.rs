#![cfg(test)]
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::clock::FixedClock;
use crate::domain::tax_id::check_digit;
use crate::domain::{Catalog, Client, NewCatalog, NewClient, NewProvider, Provider};
use crate::repo::memory::{InMemoryBookingStore, InMemoryCatalogStore, InMemoryClientStore, InMemoryProviderStore};
use crate::services::{BookingService, RegistryService, ScheduleService};

// Migrations run at most once per test process; `false` means the database is unusable.
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_db_config() -> configs::DatabaseConfig {
    let mut cfg = configs::load_default().map(|c| c.database).unwrap_or_default();
    cfg.normalize_from_env();
    cfg.min_connections = 1;
    cfg.max_connections = cfg.max_connections.max(10);
    cfg.acquire_timeout_secs = 10;
    cfg.connect_timeout_secs = 5;
    cfg
}

/// Migrated connection, or `None` when `SKIP_DB_TESTS` is set or Postgres is unreachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let cfg = test_db_config();
    let ready = *MIGRATED
        .get_or_init(|| async {
            let Ok(db) = models::db::connect_with_config(&cfg).await else {
                eprintln!("skip: cannot connect to db");
                return false;
            };
            migration::Migrator::up(&db, None).await.is_ok()
        })
        .await;
    if !ready {
        return None;
    }
    models::db::connect_with_config(&cfg).await.ok()
}

/// Fresh CPF with valid check digits, unlikely to repeat across runs.
pub fn random_cpf() -> String {
    let seed = Uuid::new_v4().as_u128();
    let mut digits: Vec<u32> = (0..9).map(|i| ((seed >> (i * 8)) % 10) as u32).collect();
    if digits.iter().all(|d| *d == digits[0]) {
        digits[0] = (digits[0] + 1) % 10;
    }
    let first = check_digit(&digits);
    digits.push(first);
    let second = check_digit(&digits);
    digits.push(second);
    digits.iter().map(|d| char::from_digit(*d, 10).unwrap_or('0')).collect()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// UTC instant expressed with a zero offset, as callers send it.
pub fn utc(date: NaiveDate, h: u32, m: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0).unwrap().from_utc_datetime(&date.and_time(hm(h, m)))
}

pub type MemBookingService = BookingService<InMemoryProviderStore, InMemoryBookingStore, InMemoryClientStore, InMemoryCatalogStore>;
pub type MemScheduleService = ScheduleService<InMemoryProviderStore>;
pub type MemRegistryService = RegistryService<InMemoryProviderStore, InMemoryClientStore, InMemoryCatalogStore>;

/// Services wired over shared in-memory stores, "today" pinned to 2030-01-01.
pub struct Fixture {
    pub providers: Arc<InMemoryProviderStore>,
    pub bookings: Arc<InMemoryBookingStore>,
    pub clients: Arc<InMemoryClientStore>,
    pub catalogs: Arc<InMemoryCatalogStore>,
    pub clock: Arc<FixedClock>,
    pub booking: MemBookingService,
    pub schedule: MemScheduleService,
    pub registry: MemRegistryService,
}

impl Fixture {
    pub fn new() -> Self {
        let providers = Arc::new(InMemoryProviderStore::default());
        let bookings = Arc::new(InMemoryBookingStore::default());
        let clients = Arc::new(InMemoryClientStore::default());
        let catalogs = Arc::new(InMemoryCatalogStore::default());
        let clock = Arc::new(FixedClock::new(ymd(2030, 1, 1)));
        Self {
            booking: BookingService::new(providers.clone(), bookings.clone(), clients.clone(), catalogs.clone()),
            schedule: ScheduleService::new(providers.clone(), clock.clone()),
            registry: RegistryService::new(providers.clone(), clients.clone(), catalogs.clone()),
            providers,
            bookings,
            clients,
            catalogs,
            clock,
        }
    }

    pub async fn catalog(&self, minutes: u32) -> Catalog {
        self.registry
            .register_catalog(NewCatalog {
                name: format!("Service {minutes}min"),
                standard_duration_minutes: minutes,
                price: 5000,
                category: "hair".into(),
                image_url: None,
            })
            .await
            .unwrap()
    }

    pub async fn client(&self, name: &str) -> Client {
        self.registry
            .register_client(NewClient { name: name.into(), email: None, phone: "11999990000".into() })
            .await
            .unwrap()
    }

    pub async fn provider(&self, catalogs: &[Uuid]) -> Provider {
        self.registry
            .register_provider(NewProvider {
                name: "Bia".into(),
                tax_id: random_cpf(),
                email: Some("bia@example.com".into()),
                phone: "11988887777".into(),
                catalogs: catalogs.to_vec(),
            })
            .await
            .unwrap()
    }
}
