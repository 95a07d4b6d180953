//! Wall clock abstraction.

use chrono::Utc;

/// Source of the current time in seconds since epoch.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> i64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }
}
