//! Source of "today" for schedule date checks.

use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// Current calendar date in UTC.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Fixed date for tests; can be moved with [`FixedClock::set`].
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today: Mutex::new(today) }
    }

    pub fn set(&self, today: NaiveDate) {
        *self.today.lock().unwrap_or_else(|e| e.into_inner()) = today;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_moves_only_when_set() {
        let day = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let clock = FixedClock::new(day);
        assert_eq!(clock.today(), day);
        clock.set(day.succ_opt().unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2030, 1, 2).unwrap());
        assert!(SystemClock.today() >= NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
