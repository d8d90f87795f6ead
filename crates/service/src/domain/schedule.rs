use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::new_id;
use crate::errors::ServiceError;

/// One contiguous time-of-day window within a daily schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub id: Uuid,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Interval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ServiceError> {
        if start >= end {
            return Err(ServiceError::InvalidInterval { start, end });
        }
        Ok(Self { id: new_id(), start, end })
    }

    /// Absolute UTC bounds of this interval on `date`.
    pub fn bounds_on(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        (Utc.from_utc_datetime(&date.and_time(self.start)), Utc.from_utc_datetime(&date.and_time(self.end)))
    }
}

/// The windows a provider accepts bookings in on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySchedule {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Sorted by start time, never empty.
    pub intervals: Vec<Interval>,
}

impl DailySchedule {
    /// Build a schedule from `(start, end)` pairs.
    ///
    /// `today` is the current UTC date; a schedule for today is allowed,
    /// anything earlier is rejected.
    pub fn new(
        date: NaiveDate,
        spans: impl IntoIterator<Item = (NaiveTime, NaiveTime)>,
        today: NaiveDate,
    ) -> Result<Self, ServiceError> {
        let spans: Vec<_> = spans.into_iter().collect();
        if spans.is_empty() {
            return Err(ServiceError::EmptySchedule);
        }
        let mut intervals = spans
            .into_iter()
            .map(|(start, end)| Interval::new(start, end))
            .collect::<Result<Vec<_>, _>>()?;
        if date < today {
            return Err(ServiceError::PastDate(date));
        }
        intervals.sort_by_key(|i| (i.start, i.end));
        Ok(Self { id: new_id(), date, intervals })
    }

    /// Whether `[start, end)` fits entirely inside one published interval.
    ///
    /// Both timestamps are normalised to UTC first. Adjacent intervals are
    /// not merged, so a window spanning two of them is refused.
    pub fn permits_booking<Tz: TimeZone>(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> bool {
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        if start >= end {
            return false;
        }
        self.intervals.iter().any(|i| {
            let (open, close) = i.bounds_on(self.date);
            start >= open && end <= close
        })
    }
}
