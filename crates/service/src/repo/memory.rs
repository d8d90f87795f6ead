//! In-memory store adapters for tests, doc examples and single-process use.
//!
//! Each store guards its state with one exclusive lock, which also makes
//! the booking check-and-insert atomic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{Booking, BookingStatus, Catalog, Client, DailySchedule, Provider};
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::repository::{BookingStore, CatalogStore, ClientStore, ProviderStore};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
pub struct InMemoryProviderStore {
    providers: Mutex<HashMap<Uuid, Provider>>,
}

#[async_trait]
impl ProviderStore for InMemoryProviderStore {
    async fn save(&self, provider: &Provider) -> Result<(), ServiceError> {
        let mut providers = lock(&self.providers);
        if !providers.contains_key(&provider.id) {
            if providers.values().any(|p| p.tax_id == provider.tax_id) {
                return Err(ServiceError::DuplicateTaxId);
            }
            providers.insert(provider.id, provider.clone());
            return Ok(());
        }
        let stored = providers.get_mut(&provider.id).ok_or(ServiceError::ProviderNotFound(provider.id))?;
        // schedules are append-only and the stored scalars win
        let mut fresh = Vec::new();
        for (date, incoming) in &provider.schedules {
            match stored.schedules.get(date) {
                Some(existing) if existing.id != incoming.id => return Err(ServiceError::DuplicateSchedule(*date)),
                Some(_) => {}
                None => fresh.push(incoming.clone()),
            }
        }
        if !fresh.is_empty() && !stored.active {
            return Err(ServiceError::ProviderInactive(stored.id));
        }
        for schedule in fresh {
            stored.schedules.insert(schedule.date, schedule);
        }
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<(), ServiceError> {
        let mut providers = lock(&self.providers);
        let provider = providers.get_mut(&id).ok_or(ServiceError::ProviderNotFound(id))?;
        provider.active = active;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Provider>, ServiceError> {
        Ok(lock(&self.providers).get(&id).cloned())
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Provider>, ServiceError> {
        Ok(lock(&self.providers).values().find(|p| p.tax_id == tax_id).cloned())
    }

    async fn find_schedule_for_date(&self, provider_id: Uuid, date: NaiveDate) -> Result<Option<DailySchedule>, ServiceError> {
        Ok(lock(&self.providers).get(&provider_id).and_then(|p| p.schedule_for(date).cloned()))
    }
}

#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingStore {
    fn overlapping<'a>(
        bookings: &'a HashMap<Uuid, Booking>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        owner: impl Fn(&Booking) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Booking> + 'a {
        bookings.values().filter(move |b| b.holds_slot() && owner(b) && b.overlaps(start, end))
    }

    fn sorted(mut found: Vec<Booking>) -> Vec<Booking> {
        found.sort_by_key(|b| (b.start, b.id));
        found
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create(&self, booking: &Booking) -> Result<(), ServiceError> {
        let mut bookings = lock(&self.bookings);
        let (start, end) = (booking.start, booking.end);
        if Self::overlapping(&bookings, start, end, |b| b.provider_id == booking.provider_id).next().is_some() {
            return Err(ServiceError::ProviderBusy);
        }
        if Self::overlapping(&bookings, start, end, |b| b.client_id == booking.client_id).next().is_some() {
            return Err(ServiceError::ClientBusy);
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_overlapping_for_provider(&self, provider_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, ServiceError> {
        let bookings = lock(&self.bookings);
        let found = Self::overlapping(&bookings, start, end, |b| b.provider_id == provider_id).cloned().collect();
        Ok(Self::sorted(found))
    }

    async fn find_overlapping_for_client(&self, client_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, ServiceError> {
        let bookings = lock(&self.bookings);
        let found = Self::overlapping(&bookings, start, end, |b| b.client_id == client_id).cloned().collect();
        Ok(Self::sorted(found))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, ServiceError> {
        Ok(lock(&self.bookings).get(&id).cloned())
    }

    async fn update_status(&self, id: Uuid, from: BookingStatus, to: BookingStatus) -> Result<(), ServiceError> {
        let mut bookings = lock(&self.bookings);
        let booking = bookings.get_mut(&id).ok_or(ServiceError::BookingNotFound(id))?;
        if booking.status != from {
            return Err(ServiceError::InvalidTransition { from: booking.status, to });
        }
        booking.status = to;
        Ok(())
    }

    async fn list_for_provider(&self, provider_id: Uuid, page: Pagination) -> Result<Vec<Booking>, ServiceError> {
        let (skip, take) = page.window();
        let bookings = lock(&self.bookings);
        let all = Self::sorted(bookings.values().filter(|b| b.provider_id == provider_id).cloned().collect());
        Ok(all.into_iter().skip(skip).take(take).collect())
    }
}

#[derive(Default)]
pub struct InMemoryClientStore {
    clients: Mutex<HashMap<Uuid, Client>>,
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn save(&self, client: &Client) -> Result<(), ServiceError> {
        lock(&self.clients).insert(client.id, client.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, ServiceError> {
        Ok(lock(&self.clients).get(&id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryCatalogStore {
    catalogs: Mutex<HashMap<Uuid, Catalog>>,
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn save(&self, catalog: &Catalog) -> Result<(), ServiceError> {
        lock(&self.catalogs).insert(catalog.id, catalog.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Catalog>, ServiceError> {
        Ok(lock(&self.catalogs).get(&id).cloned())
    }
}
