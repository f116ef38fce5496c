//! Source of "now" and "today".

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Utc};

pub trait Clock {
    /// Current instant, used for ids and timestamps.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in the host locale.
    fn today(&self) -> NaiveDate;
}

/// The host's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        FixedClock { now }
    }

    /// Noon UTC on `date`.
    pub fn on(date: NaiveDate) -> Self {
        FixedClock {
            now: date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(12),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}
