//! Wall-clock abstraction so day- and hour-boundary logic stays testable.

use time::{OffsetDateTime, UtcOffset};

/// Source of "now" shared by command handling and the background loops.
///
/// Every poll cycle reads the clock once and compares everything against that
/// single timestamp, so a cycle never observes a skewed mix of instants.
pub trait Clock: Send + Sync {
    /// Current timestamp, already shifted to the deployment's offset.
    fn now(&self) -> OffsetDateTime;
}

/// Real clock reporting UTC time shifted by a fixed, configured offset.
#[derive(Debug, Clone)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    /// Build a clock anchored to the given UTC offset.
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// Hand-driven clock for deterministic scheduler and watcher tests.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<OffsetDateTime>,
}

#[cfg(test)]
impl ManualClock {
    /// Start the clock at the given instant.
    pub fn starting_at(now: OffsetDateTime) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    /// Jump the clock to a new instant.
    pub fn set(&self, now: OffsetDateTime) {
        *self.now.lock().unwrap() = now;
    }

    /// Move the clock forward by the given duration.
    pub fn advance(&self, by: time::Duration) {
        let mut guard = self.now.lock().unwrap();
        *guard += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}
