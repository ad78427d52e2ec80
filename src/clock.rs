//! Clock abstraction
//!
//! Current streaks, backlog aging and abandonment idle time all compare against
//! "now". Analytics never read the system time directly; they ask a [`Clock`].

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current instant
pub trait Clock {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in UTC
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
