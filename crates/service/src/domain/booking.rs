use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::new_id;
use crate::errors::ServiceError;

pub const MAX_NOTES_CHARS: usize = 500;

/// Booking lifecycle.
///
/// `Pending -> {Confirmed, Cancelled}`, `Confirmed -> {Completed, Cancelled}`.
/// `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

/// Creation command. The end of the window is never supplied by the
/// caller; it follows from the catalog duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub catalog_id: Uuid,
    pub start: DateTime<FixedOffset>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub provider_id: Uuid,
    pub catalog_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// New `Pending` booking covering `[start, start + duration)`.
    pub fn new(
        client_id: Uuid,
        provider_id: Uuid,
        catalog_id: Uuid,
        start: DateTime<Utc>,
        duration: Duration,
        notes: Option<String>,
    ) -> Result<Self, ServiceError> {
        if duration <= Duration::zero() {
            return Err(ServiceError::InvalidBookingWindow);
        }
        let end = start.checked_add_signed(duration).ok_or(ServiceError::InvalidBookingWindow)?;
        Ok(Self {
            id: new_id(),
            client_id,
            provider_id,
            catalog_id,
            start,
            end,
            status: BookingStatus::Pending,
            notes: normalize_notes(notes)?,
            created_at: Utc::now(),
        })
    }

    /// Half-open overlap with `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    /// Whether this booking still occupies its window.
    pub fn holds_slot(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    pub fn transition_to(&mut self, next: BookingStatus) -> Result<(), ServiceError> {
        if !self.status.can_transition_to(next) {
            return Err(ServiceError::InvalidTransition { from: self.status, to: next });
        }
        self.status = next;
        Ok(())
    }
}

/// Trim notes, drop blank ones, enforce the length cap.
pub fn normalize_notes(notes: Option<String>) -> Result<Option<String>, ServiceError> {
    let Some(notes) = notes else { return Ok(None) };
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let len = trimmed.chars().count();
    if len > MAX_NOTES_CHARS {
        return Err(ServiceError::NotesTooLong(len));
    }
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booking_at(h: u32, minutes: i64) -> Booking {
        let start = Utc.with_ymd_and_hms(2030, 1, 3, h, 0, 0).unwrap();
        Booking::new(Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7(), start, Duration::minutes(minutes), None).unwrap()
    }

    #[test]
    fn new_booking_is_pending_with_derived_end() {
        let b = booking_at(10, 60);
        assert_eq!(b.status, BookingStatus::Pending);
        assert_eq!(b.end - b.start, Duration::minutes(60));
    }

    #[test]
    fn zero_duration_is_invalid() {
        let start = Utc.with_ymd_and_hms(2030, 1, 3, 10, 0, 0).unwrap();
        let res = Booking::new(Uuid::nil(), Uuid::nil(), Uuid::nil(), start, Duration::zero(), None);
        assert!(matches!(res, Err(ServiceError::InvalidBookingWindow)));
    }

    #[test]
    fn overlap_is_half_open() {
        let b = booking_at(10, 60);
        let at = |h, m| Utc.with_ymd_and_hms(2030, 1, 3, h, m, 0).unwrap();
        assert!(b.overlaps(at(10, 30), at(11, 30)));
        assert!(b.overlaps(at(9, 30), at(10, 1)));
        assert!(!b.overlaps(at(11, 0), at(12, 0)));
        assert!(!b.overlaps(at(9, 0), at(10, 0)));
    }

    #[test]
    fn state_machine_shape() {
        use BookingStatus::*;
        let all = [Pending, Confirmed, Cancelled, Completed];
        let allowed = [(Pending, Confirmed), (Pending, Cancelled), (Confirmed, Completed), (Confirmed, Cancelled)];
        for from in all {
            for to in all {
                assert_eq!(from.can_transition_to(to), allowed.contains(&(from, to)), "{from} -> {to}");
            }
        }
        assert!(Cancelled.is_terminal() && Completed.is_terminal());
        assert!(!Pending.is_terminal());
    }

    #[test]
    fn illegal_transition_keeps_status() {
        let mut b = booking_at(10, 60);
        let err = b.transition_to(BookingStatus::Completed).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition { from: BookingStatus::Pending, .. }));
        assert_eq!(b.status, BookingStatus::Pending);
        b.transition_to(BookingStatus::Cancelled).unwrap();
        assert!(!b.holds_slot());
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!("confirmed".parse::<BookingStatus>().unwrap(), BookingStatus::Confirmed);
        assert!("archived".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn request_wire_shape() {
        let req: BookingRequest = serde_json::from_str(
            r#"{"client_id":"0190a1b2-0000-7000-8000-000000000001","provider_id":"0190a1b2-0000-7000-8000-000000000002",
                "catalog_id":"0190a1b2-0000-7000-8000-000000000003","start":"2030-01-03T07:01:00-03:00","notes":null}"#,
        )
        .unwrap();
        assert_eq!(req.start.with_timezone(&Utc), Utc.with_ymd_and_hms(2030, 1, 3, 10, 1, 0).unwrap());
        assert_eq!(serde_json::to_string(&BookingStatus::Cancelled).unwrap(), r#""cancelled""#);
    }

    #[test]
    fn notes_are_trimmed_and_capped() {
        assert_eq!(normalize_notes(Some("  hi ".into())).unwrap(), Some("hi".into()));
        assert_eq!(normalize_notes(Some("   ".into())).unwrap(), None);
        assert!(normalize_notes(Some("é".repeat(500))).unwrap().is_some());
        assert!(matches!(normalize_notes(Some("x".repeat(501))), Err(ServiceError::NotesTooLong(501))));
    }
}
