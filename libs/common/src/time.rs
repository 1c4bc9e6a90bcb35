//! Wall-clock abstraction
//!
//! Everything that reads "now" (stopwatch laps, countdowns, city clocks,
//! alarm ids) goes through [`TimeProvider`] so tests can pin or advance time.

use std::sync::atomic::{AtomicI64, Ordering};

/// Source of the current time in milliseconds since the Unix epoch
pub trait TimeProvider: Send + Sync + 'static {
    fn now_millis(&self) -> i64;
}

/// System clock, via `chrono::Utc`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for deterministic tests
///
/// Starts at a fixed timestamp and only moves when told to.
#[derive(Debug, Default)]
pub struct ManualTimeProvider {
    timestamp_ms: AtomicI64,
}

impl ManualTimeProvider {
    pub fn new(timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms: AtomicI64::new(timestamp_ms),
        }
    }

    /// Jump to an absolute timestamp
    pub fn set(&self, timestamp_ms: i64) {
        self.timestamp_ms.store(timestamp_ms, Ordering::SeqCst);
    }

    /// Move forward by `delta_ms` and return the new timestamp
    pub fn advance(&self, delta_ms: i64) -> i64 {
        self.timestamp_ms.fetch_add(delta_ms, Ordering::SeqCst) + delta_ms
    }
}

impl TimeProvider for ManualTimeProvider {
    fn now_millis(&self) -> i64 {
        self.timestamp_ms.load(Ordering::SeqCst)
    }
}
