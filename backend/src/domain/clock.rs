//! Time source for everything that needs "now".
//!
//! Calendar cells are classified against the clock's current date, so the
//! clock is injected instead of read from the system directly. Tests pin it
//! with [`FixedClock`].

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Supplies the current local date and time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Calendar date of `now()`, time of day dropped
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the host's local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Pinned to mid-morning of `date`
    pub fn on(date: NaiveDate) -> Self {
        let now = date
            .and_hms_opt(10, 30, 0)
            .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_today_drops_time_of_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        let clock = FixedClock::new(date.and_hms_opt(23, 59, 59).unwrap());
        assert_eq!(clock.today(), date);
    }

    #[test]
    fn test_fixed_clock_on_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), clock.now());
    }
}
