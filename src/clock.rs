//! Clock abstraction so time is injectable and deterministic in tests

use chrono::{DateTime, Utc};

/// Source of the current instant
pub trait Clock {
    /// Returns the current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production wiring
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
