//! Countdown timer
//!
//! `remaining` is recomputed on every read while running; the timer stops
//! itself the first time it is observed at zero.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountdownTimer {
    started_at_ms: Option<i64>,
    duration_ms: i64,
    remaining_ms: i64,
}

/// What `GET /api/timer` reports; times are in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub running: bool,
    pub remaining: f64,
    pub duration: f64,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// Start a fresh countdown of `duration_secs`.
    ///
    /// Returns `false` and changes nothing unless the duration is positive.
    pub fn start(&mut self, now_ms: i64, duration_secs: f64) -> bool {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return false;
        }
        let duration_ms = (duration_secs * 1000.0).round() as i64;
        self.started_at_ms = Some(now_ms);
        self.duration_ms = duration_ms;
        self.remaining_ms = duration_ms;
        true
    }

    /// Freeze `remaining`; no-op while stopped
    pub fn stop(&mut self, now_ms: i64) {
        self.refresh(now_ms);
        self.started_at_ms = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&mut self, now_ms: i64) -> TimerSnapshot {
        self.refresh(now_ms);
        TimerSnapshot {
            running: self.is_running(),
            remaining: self.remaining_ms as f64 / 1000.0,
            duration: self.duration_ms as f64 / 1000.0,
        }
    }

    fn refresh(&mut self, now_ms: i64) {
        if let Some(started) = self.started_at_ms {
            let elapsed = (now_ms - started).max(0);
            self.remaining_ms = (self.duration_ms - elapsed).max(0);
            if self.remaining_ms == 0 {
                self.started_at_ms = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down() {
        let mut timer = CountdownTimer::new();
        assert!(timer.start(1_000, 10.0));

        let snap = timer.snapshot(4_500);
        assert!(snap.running);
        assert_eq!(snap.remaining, 6.5);
        assert_eq!(snap.duration, 10.0);
    }

    #[test]
    fn test_expires_and_stops_itself() {
        let mut timer = CountdownTimer::new();
        timer.start(0, 2.0);

        let snap = timer.snapshot(60_000);
        assert!(!snap.running);
        assert_eq!(snap.remaining, 0.0);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let mut timer = CountdownTimer::new();
        assert!(!timer.start(0, 0.0));
        assert!(!timer.start(0, -5.0));
        assert!(!timer.start(0, f64::NAN));
        assert_eq!(timer, CountdownTimer::default());
    }

    #[test]
    fn test_stop_freezes_remaining() {
        let mut timer = CountdownTimer::new();
        timer.start(0, 30.0);
        timer.stop(12_000);

        let snap = timer.snapshot(25_000);
        assert!(!snap.running);
        assert_eq!(snap.remaining, 18.0);
    }

    #[test]
    fn test_restart_replaces_countdown() {
        let mut timer = CountdownTimer::new();
        timer.start(0, 30.0);
        timer.start(5_000, 1.5);

        assert_eq!(timer.snapshot(5_500).remaining, 1.0);
        timer.reset();
        let snap = timer.snapshot(6_000);
        assert!(!snap.running);
        assert_eq!(snap.remaining, 0.0);
        assert_eq!(snap.duration, 0.0);
    }
}
