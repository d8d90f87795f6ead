use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::booking::normalize_notes;
use crate::domain::{Booking, BookingRequest, BookingStatus};
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::repository::{BookingStore, CatalogStore, ClientStore, ProviderStore};

/// Creates bookings and drives them through their lifecycle.
pub struct BookingService<P, B, C, K> {
    providers: Arc<P>,
    bookings: Arc<B>,
    clients: Arc<C>,
    catalogs: Arc<K>,
}

impl<P, B, C, K> BookingService<P, B, C, K>
where
    P: ProviderStore,
    B: BookingStore,
    C: ClientStore,
    K: CatalogStore,
{
    pub fn new(providers: Arc<P>, bookings: Arc<B>, clients: Arc<C>, catalogs: Arc<K>) -> Self {
        Self { providers, bookings, clients, catalogs }
    }

    /// Validate a request against the provider's schedule and existing
    /// bookings, then persist it as `Pending`.
    ///
    /// Nothing is written unless every check passes.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    /// use service::domain::*;
    /// use service::repo::memory::*;
    /// use service::repository::{CatalogStore, ClientStore, ProviderStore};
    /// use service::services::BookingService;
    ///
    /// let providers = Arc::new(InMemoryProviderStore::default());
    /// let clients = Arc::new(InMemoryClientStore::default());
    /// let catalogs = Arc::new(InMemoryCatalogStore::default());
    /// let svc = BookingService::new(providers.clone(), Arc::new(InMemoryBookingStore::default()), clients.clone(), catalogs.clone());
    ///
    /// let cut = Catalog::new(NewCatalog { name: "Cut".into(), standard_duration_minutes: 60, price: 5000, category: "hair".into(), image_url: None }).unwrap();
    /// let ana = Client::new(NewClient { name: "Ana".into(), email: None, phone: "11999990000".into() }).unwrap();
    /// let mut bia = Provider::new(NewProvider { name: "Bia".into(), tax_id: "529.982.247-25".into(), email: None, phone: "11988887777".into(), catalogs: vec![cut.id] }).unwrap();
    /// let day = NaiveDate::from_ymd_opt(2030, 1, 3).unwrap();
    /// let span = (NaiveTime::from_hms_opt(8, 0, 0).unwrap(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    /// bia.add_schedule(DailySchedule::new(day, [span], day).unwrap()).unwrap();
    /// tokio_test::block_on(async {
    ///     catalogs.save(&cut).await.unwrap();
    ///     clients.save(&ana).await.unwrap();
    ///     providers.save(&bia).await.unwrap();
    /// });
    ///
    /// let start = Utc.with_ymd_and_hms(2030, 1, 3, 10, 1, 0).unwrap().fixed_offset();
    /// let req = BookingRequest { client_id: ana.id, provider_id: bia.id, catalog_id: cut.id, start, notes: None };
    /// let booking = tokio_test::block_on(svc.create_booking(req)).unwrap();
    /// assert_eq!(booking.status, BookingStatus::Pending);
    /// ```
    #[instrument(skip(self, req), fields(client_id = %req.client_id, provider_id = %req.provider_id, catalog_id = %req.catalog_id, start = %req.start))]
    pub async fn create_booking(&self, req: BookingRequest) -> Result<Booking, ServiceError> {
        let notes = normalize_notes(req.notes)?;

        let client = self.clients.find_by_id(req.client_id).await?.ok_or(ServiceError::ClientNotFound(req.client_id))?;
        let provider = self
            .providers
            .find_by_id(req.provider_id)
            .await?
            .ok_or(ServiceError::ProviderNotFound(req.provider_id))?;
        let catalog = self
            .catalogs
            .find_by_id(req.catalog_id)
            .await?
            .ok_or(ServiceError::CatalogNotFound(req.catalog_id))?;
        if !provider.offers(catalog.id) {
            return Err(ServiceError::CatalogNotOfferedByProvider { provider_id: provider.id, catalog_id: catalog.id });
        }
        provider.ensure_active()?;

        let start = req.start.with_timezone(&Utc);
        let end = start.checked_add_signed(catalog.duration()).ok_or(ServiceError::InvalidBookingWindow)?;
        let date = start.date_naive();

        let Some(schedule) = provider.schedule_for(date) else {
            debug!(%date, "no schedule for date");
            return Err(ServiceError::DayUnavailable(date));
        };
        if !schedule.permits_booking(&start, &end) {
            debug!(%start, %end, "window outside published intervals");
            return Err(ServiceError::SlotUnavailable);
        }

        let provider_clash = self.bookings.find_overlapping_for_provider(provider.id, start, end).await?;
        if let Some(existing) = provider_clash.first() {
            debug!(existing = %existing.id, "provider already booked");
            return Err(ServiceError::ProviderBusy);
        }
        let client_clash = self.bookings.find_overlapping_for_client(client.id, start, end).await?;
        if let Some(existing) = client_clash.first() {
            debug!(existing = %existing.id, "client already booked");
            return Err(ServiceError::ClientBusy);
        }

        let booking = Booking::new(client.id, provider.id, catalog.id, start, catalog.duration(), notes)?;
        self.bookings.create(&booking).await?;
        info!(booking_id = %booking.id, start = %booking.start, end = %booking.end, "booking_created");
        Ok(booking)
    }

    #[instrument(skip(self))]
    pub async fn get_booking(&self, id: Uuid) -> Result<Booking, ServiceError> {
        self.bookings.find_by_id(id).await?.ok_or(ServiceError::BookingNotFound(id))
    }

    /// Bookings of a provider ordered by start time, cancelled ones included.
    #[instrument(skip(self))]
    pub async fn list_for_provider(&self, provider_id: Uuid, page: Pagination) -> Result<Vec<Booking>, ServiceError> {
        if self.providers.find_by_id(provider_id).await?.is_none() {
            return Err(ServiceError::ProviderNotFound(provider_id));
        }
        self.bookings.list_for_provider(provider_id, page).await
    }

    pub async fn confirm_booking(&self, id: Uuid) -> Result<Booking, ServiceError> {
        self.transition(id, BookingStatus::Confirmed).await
    }

    /// Cancelling frees the window for new bookings immediately.
    pub async fn cancel_booking(&self, id: Uuid) -> Result<Booking, ServiceError> {
        self.transition(id, BookingStatus::Cancelled).await
    }

    pub async fn complete_booking(&self, id: Uuid) -> Result<Booking, ServiceError> {
        self.transition(id, BookingStatus::Completed).await
    }

    #[instrument(skip(self))]
    async fn transition(&self, id: Uuid, next: BookingStatus) -> Result<Booking, ServiceError> {
        let mut booking = self.get_booking(id).await?;
        let from = booking.status;
        if from.is_terminal() {
            debug!(%from, "booking already settled");
            return Err(ServiceError::InvalidTransition { from, to: next });
        }
        booking.transition_to(next)?;
        // applies only if no other writer moved the booking since the read
        self.bookings.update_status(id, from, next).await?;
        info!(booking_id = %id, %from, to = %next, "booking_status_changed");
        Ok(booking)
    }
}
