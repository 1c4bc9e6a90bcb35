//! Stopwatch with pause/resume
//!
//! Pure state machine: every operation takes `now_ms` so the caller decides
//! which clock drives it.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stopwatch {
    started_at_ms: Option<i64>,
    accumulated_ms: i64,
}

/// What `GET /api/stopwatch` reports; `elapsed` is in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StopwatchSnapshot {
    pub running: bool,
    pub elapsed: f64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// Start or resume; no-op while running
    pub fn start(&mut self, now_ms: i64) {
        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(now_ms);
        }
    }

    /// Fold the running lap into the total; no-op while stopped
    pub fn stop(&mut self, now_ms: i64) {
        if let Some(started) = self.started_at_ms.take() {
            self.accumulated_ms += (now_ms - started).max(0);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed_ms(&self, now_ms: i64) -> i64 {
        let lap = self
            .started_at_ms
            .map(|started| (now_ms - started).max(0))
            .unwrap_or(0);
        self.accumulated_ms + lap
    }

    pub fn snapshot(&self, now_ms: i64) -> StopwatchSnapshot {
        StopwatchSnapshot {
            running: self.is_running(),
            elapsed: self.elapsed_ms(now_ms) as f64 / 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_across_laps() {
        let mut sw = Stopwatch::new();
        sw.start(1_000);
        assert_eq!(sw.elapsed_ms(3_500), 2_500);

        sw.stop(4_000);
        assert_eq!(sw.elapsed_ms(10_000), 3_000);
        assert!(!sw.is_running());

        sw.start(20_000);
        let snap = sw.snapshot(21_250);
        assert!(snap.running);
        assert_eq!(snap.elapsed, 4.25);
    }

    #[test]
    fn test_start_while_running_keeps_original_lap() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.start(5_000);
        assert_eq!(sw.elapsed_ms(6_000), 6_000);
    }

    #[test]
    fn test_stop_and_reset_when_idle() {
        let mut sw = Stopwatch::new();
        sw.stop(1_000);
        assert_eq!(sw.elapsed_ms(2_000), 0);

        sw.start(0);
        sw.reset();
        assert_eq!(sw.snapshot(9_000), StopwatchSnapshot { running: false, elapsed: 0.0 });
    }

    #[test]
    fn test_clock_going_backwards_never_subtracts() {
        let mut sw = Stopwatch::new();
        sw.start(5_000);
        assert_eq!(sw.elapsed_ms(4_000), 0);
        sw.stop(4_000);
        assert_eq!(sw.elapsed_ms(0), 0);
    }
}
