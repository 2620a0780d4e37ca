//! Wall-clock source for entry timestamps.

use chrono::{DateTime, Utc};

/// Supplies the instant stamped onto new entries.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// System UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
