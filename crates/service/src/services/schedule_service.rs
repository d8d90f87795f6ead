use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::clock::Clock;
use crate::domain::DailySchedule;
use crate::errors::ServiceError;
use crate::repository::ProviderStore;

/// Publishes provider availability, one schedule per calendar date.
pub struct ScheduleService<P> {
    providers: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P: ProviderStore> ScheduleService<P> {
    pub fn new(providers: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self { providers, clock }
    }

    /// Attach a schedule for `date` built from `(start, end)` spans.
    ///
    /// The provider is persisted together with the new schedule and all of
    /// its intervals, or not at all.
    #[instrument(skip(self, spans), fields(spans = spans.len()))]
    pub async fn register_schedule(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
        spans: Vec<(NaiveTime, NaiveTime)>,
    ) -> Result<DailySchedule, ServiceError> {
        let mut provider = self
            .providers
            .find_by_id(provider_id)
            .await?
            .ok_or(ServiceError::ProviderNotFound(provider_id))?;
        provider.ensure_active()?;
        if let Err(e) = provider.ensure_date_free(date) {
            debug!(%date, "schedule already published");
            return Err(e);
        }

        let schedule = DailySchedule::new(date, spans, self.clock.today())?;
        provider.add_schedule(schedule.clone())?;
        self.providers.save(&provider).await?;
        info!(schedule_id = %schedule.id, %provider_id, %date, intervals = schedule.intervals.len(), "schedule_registered");
        Ok(schedule)
    }

    #[instrument(skip(self))]
    pub async fn schedule_for_date(&self, provider_id: Uuid, date: NaiveDate) -> Result<DailySchedule, ServiceError> {
        if let Some(schedule) = self.providers.find_schedule_for_date(provider_id, date).await? {
            return Ok(schedule);
        }
        if self.providers.find_by_id(provider_id).await?.is_none() {
            return Err(ServiceError::ProviderNotFound(provider_id));
        }
        Err(ServiceError::ScheduleNotFound { provider_id, date })
    }
}
