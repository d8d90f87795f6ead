use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::BookingStatus;

/// Boxed cause carried by [`ServiceError::Infrastructure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification callers can branch on without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Invalid,
    Conflict,
    PreconditionFailed,
    Infrastructure,
}

/// Every failure the booking engine can report.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("client {0} not found")]
    ClientNotFound(Uuid),
    #[error("provider {0} not found")]
    ProviderNotFound(Uuid),
    #[error("catalog {0} not found")]
    CatalogNotFound(Uuid),
    #[error("no schedule for provider {provider_id} on {date}")]
    ScheduleNotFound { provider_id: Uuid, date: NaiveDate },
    #[error("booking {0} not found")]
    BookingNotFound(Uuid),

    #[error("invalid interval {start}-{end}: start must be before end")]
    InvalidInterval { start: NaiveTime, end: NaiveTime },
    #[error("a daily schedule needs at least one interval")]
    EmptySchedule,
    #[error("schedule date {0} is in the past")]
    PastDate(NaiveDate),
    #[error("booking window must start before it ends")]
    InvalidBookingWindow,
    #[error("notes too long: {0} characters (max 500)")]
    NotesTooLong(usize),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("invalid client: {0}")]
    InvalidClient(String),
    #[error("invalid provider: {0}")]
    InvalidProvider(String),
    #[error("invalid tax id: {0}")]
    InvalidTaxId(String),

    #[error("provider already has a schedule on {0}")]
    DuplicateSchedule(NaiveDate),
    #[error("provider is already booked in the requested window")]
    ProviderBusy,
    #[error("client already has a booking in the requested window")]
    ClientBusy,
    #[error("requested window is outside the provider's published intervals")]
    SlotUnavailable,
    #[error("provider has no schedule on {0}")]
    DayUnavailable(NaiveDate),
    #[error("catalog {catalog_id} is not offered by provider {provider_id}")]
    CatalogNotOfferedByProvider { provider_id: Uuid, catalog_id: Uuid },
    #[error("a provider with this tax id already exists")]
    DuplicateTaxId,
    #[error("booking cannot move from {from} to {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },

    #[error("provider {0} is inactive")]
    ProviderInactive(Uuid),

    #[error("{context}: {source}")]
    Infrastructure {
        context: String,
        #[source]
        source: BoxError,
    },
}

impl ServiceError {
    /// Wrap a storage failure with the operation that produced it.
    pub fn infra(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Infrastructure { context: context.into(), source: source.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        use ServiceError::*;
        match self {
            ClientNotFound(_) | ProviderNotFound(_) | CatalogNotFound(_) | ScheduleNotFound { .. } | BookingNotFound(_) => {
                ErrorKind::NotFound
            }
            InvalidInterval { .. } | EmptySchedule | PastDate(_) | InvalidBookingWindow | NotesTooLong(_) | InvalidCatalog(_)
            | InvalidClient(_) | InvalidProvider(_) | InvalidTaxId(_) => ErrorKind::Invalid,
            DuplicateSchedule(_) | ProviderBusy | ClientBusy | SlotUnavailable | DayUnavailable(_)
            | CatalogNotOfferedByProvider { .. } | DuplicateTaxId | InvalidTransition { .. } => ErrorKind::Conflict,
            ProviderInactive(_) => ErrorKind::PreconditionFailed,
            Infrastructure { .. } => ErrorKind::Infrastructure,
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        use ServiceError::*;
        match self {
            ClientNotFound(_) => 1001,
            ProviderNotFound(_) => 1002,
            CatalogNotFound(_) => 1003,
            ScheduleNotFound { .. } => 1004,
            BookingNotFound(_) => 1005,
            InvalidInterval { .. } => 2001,
            EmptySchedule => 2002,
            PastDate(_) => 2003,
            InvalidBookingWindow => 2004,
            NotesTooLong(_) => 2005,
            InvalidCatalog(_) => 2006,
            InvalidClient(_) => 2007,
            InvalidProvider(_) => 2008,
            InvalidTaxId(_) => 2009,
            DuplicateSchedule(_) => 3001,
            ProviderBusy => 3002,
            ClientBusy => 3003,
            SlotUnavailable => 3004,
            DayUnavailable(_) => 3005,
            CatalogNotOfferedByProvider { .. } => 3006,
            DuplicateTaxId => 3007,
            InvalidTransition { .. } => 3008,
            ProviderInactive(_) => 4001,
            Infrastructure { .. } => 5000,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        Self::infra("model", e)
    }
}
