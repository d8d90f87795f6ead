//! Storage ports consumed by the booking engine.
//!
//! "Not found" is `Ok(None)`; services turn it into the matching typed
//! error. Adapters live under [`crate::repo`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Booking, BookingStatus, Catalog, Client, DailySchedule, Provider};
use crate::errors::ServiceError;
use crate::pagination::Pagination;

#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// Persist the provider, its catalog links and any schedules not yet
    /// stored, as one atomic unit. Fails with `DuplicateTaxId` or
    /// `DuplicateSchedule` when a concurrent writer got there first.
    ///
    /// For a provider that is already stored only the new schedules are
    /// written; its scalar fields, `active` included, keep their stored
    /// values. Appending a schedule to a provider stored as inactive fails
    /// with `ProviderInactive`.
    async fn save(&self, provider: &Provider) -> Result<(), ServiceError>;
    /// Fails with `ProviderNotFound` if no such provider is stored.
    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Provider>, ServiceError>;
    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Provider>, ServiceError>;
    async fn find_schedule_for_date(&self, provider_id: Uuid, date: NaiveDate) -> Result<Option<DailySchedule>, ServiceError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Atomic check-and-insert: rejects with `ProviderBusy` / `ClientBusy`
    /// if a non-cancelled booking overlapping the window exists at commit
    /// time, so two racing callers cannot both win.
    async fn create(&self, booking: &Booking) -> Result<(), ServiceError>;
    /// Non-cancelled bookings of the provider intersecting `[start, end)`.
    async fn find_overlapping_for_provider(&self, provider_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, ServiceError>;
    /// Non-cancelled bookings of the client, any provider, intersecting `[start, end)`.
    async fn find_overlapping_for_client(&self, client_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, ServiceError>;
    /// Compare-and-set of the status: writes `to` only while the stored
    /// status is still `from`, otherwise fails with `InvalidTransition`
    /// carrying the stored status.
    async fn update_status(&self, id: Uuid, from: BookingStatus, to: BookingStatus) -> Result<(), ServiceError>;
    /// Provider's bookings ordered by start time.
    async fn list_for_provider(&self, provider_id: Uuid, page: Pagination) -> Result<Vec<Booking>, ServiceError>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn save(&self, client: &Client) -> Result<(), ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, ServiceError>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn save(&self, catalog: &Catalog) -> Result<(), ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Catalog>, ServiceError>;
}
