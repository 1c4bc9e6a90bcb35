//! Stopwatch and countdown timer handlers

use axum::{extract::State, response::Json};
use tracing::{debug, info};

use super::models::TimerStartRequest;
use crate::stopwatch::StopwatchSnapshot;
use crate::timer::TimerSnapshot;
use crate::AppState;

pub async fn stopwatch_state(State(state): State<AppState>) -> Json<StopwatchSnapshot> {
    let now = state.now_millis();
    Json(state.stopwatch.lock().snapshot(now))
}

pub async fn stopwatch_start(State(state): State<AppState>) -> Json<StopwatchSnapshot> {
    let now = state.now_millis();
    let mut stopwatch = state.stopwatch.lock();
    stopwatch.start(now);
    Json(stopwatch.snapshot(now))
}

pub async fn stopwatch_stop(State(state): State<AppState>) -> Json<StopwatchSnapshot> {
    let now = state.now_millis();
    let mut stopwatch = state.stopwatch.lock();
    stopwatch.stop(now);
    Json(stopwatch.snapshot(now))
}

pub async fn stopwatch_reset(State(state): State<AppState>) -> Json<StopwatchSnapshot> {
    let now = state.now_millis();
    let mut stopwatch = state.stopwatch.lock();
    stopwatch.reset();
    Json(stopwatch.snapshot(now))
}

pub async fn timer_state(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let now = state.now_millis();
    Json(state.timer.lock().snapshot(now))
}

/// A missing or non-positive `duration` leaves the timer untouched
pub async fn timer_start(
    State(state): State<AppState>,
    body: Option<Json<TimerStartRequest>>,
) -> Json<TimerSnapshot> {
    let duration = body.map(|Json(b)| b.duration).unwrap_or_default();
    let now = state.now_millis();
    let mut timer = state.timer.lock();
    if timer.start(now, duration) {
        info!("Timer started for {}s", duration);
    } else {
        debug!("Ignoring timer start with duration {}", duration);
    }
    Json(timer.snapshot(now))
}

pub async fn timer_stop(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let now = state.now_millis();
    let mut timer = state.timer.lock();
    timer.stop(now);
    Json(timer.snapshot(now))
}

pub async fn timer_reset(State(state): State<AppState>) -> Json<TimerSnapshot> {
    let now = state.now_millis();
    let mut timer = state.timer.lock();
    timer.reset();
    Json(timer.snapshot(now))
}
