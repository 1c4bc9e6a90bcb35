//! Alarm handlers
//!
//! Each handler takes the store lock for the whole ring operation and
//! releases it before returning.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use reloj_ring::RingStructure;
use tracing::debug;

use super::models::{CountResponse, ResetResponse};
use crate::alarm::{validate_time, Alarm, AlarmPatch, NewAlarm};
use crate::error::{invalid_input, Result};
use crate::AppState;

fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| invalid_input(format!("alarm id must be an integer, got '{}'", raw)))
}

pub async fn list_alarms(State(state): State<AppState>) -> Json<Vec<Alarm>> {
    Json(state.alarms.lock().list())
}

pub async fn create_alarm(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewAlarm>, JsonRejection>,
) -> Result<(StatusCode, Json<Alarm>)> {
    let Json(body) = body?;
    let time = body
        .time
        .ok_or_else(|| invalid_input("time is required"))?;
    validate_time(&time)?;

    let id = state.alarm_ids.next_id(state.now_millis());
    let alarm = state.alarms.lock().add(Alarm::new(id, time, body.label));
    Ok((StatusCode::CREATED, Json(alarm)))
}

pub async fn get_alarm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Alarm>> {
    let id = parse_id(&id)?;
    state.alarms.lock().get(id).map(Json)
}

pub async fn update_alarm(
    State(state): State<AppState>,
    Path(id): Path<String>,
    patch: std::result::Result<Json<AlarmPatch>, JsonRejection>,
) -> Result<Json<Alarm>> {
    let id = parse_id(&id)?;
    let Json(patch) = patch?;
    patch.validate()?;
    state.alarms.lock().update(id, patch).map(Json)
}

pub async fn delete_alarm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    state.alarms.lock().delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn next_alarm(State(state): State<AppState>) -> Result<Json<Alarm>> {
    state.alarms.lock().next().map(Json)
}

pub async fn prev_alarm(State(state): State<AppState>) -> Result<Json<Alarm>> {
    state.alarms.lock().prev().map(Json)
}

pub async fn current_alarm(State(state): State<AppState>) -> Result<Json<Alarm>> {
    state.alarms.lock().current().map(Json)
}

pub async fn reset_navigation(State(state): State<AppState>) -> Result<Json<ResetResponse>> {
    let current = state.alarms.lock().reset()?;
    debug!("Navigation reset to alarm {}", current.id);
    Ok(Json(ResetResponse {
        message: "Navigation reset",
        current,
    }))
}

pub async fn count_alarms(State(state): State<AppState>) -> Json<CountResponse> {
    Json(CountResponse {
        count: state.alarms.lock().count(),
    })
}

pub async fn alarm_structure(State(state): State<AppState>) -> Json<RingStructure> {
    Json(state.alarms.lock().structure())
}
