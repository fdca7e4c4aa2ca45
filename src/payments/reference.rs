//! Correlation reference generation
//!
//! References are derived from wall-clock milliseconds, so two calls landing
//! in the same millisecond get the same value. They are correlation tags, not
//! idempotency keys.

use chrono::Utc;

pub const REFERENCE_PREFIX: &str = "OPAY";

/// Source of the current time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

pub fn generate_reference(clock: &dyn Clock) -> String {
    format!("{}-{}", REFERENCE_PREFIX, clock.now_millis())
}
