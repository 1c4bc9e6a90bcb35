//! World clock and environment clock handlers

use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::info;

use super::models::{CitiesResponse, SelectCityRequest, WorldClockResponse};
use crate::env_clock::EnvReport;
use crate::error::{ClockError, Result};
use crate::world_clock::CityTime;
use crate::AppState;

pub async fn world_clock_all(State(state): State<AppState>) -> Json<WorldClockResponse> {
    Json(WorldClockResponse {
        cities: state.world_clock.all(),
        success: true,
    })
}

pub async fn world_clock_cities(State(state): State<AppState>) -> Json<CitiesResponse> {
    Json(CitiesResponse {
        cities: state.world_clock.city_names(),
    })
}

pub async fn world_clock_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<CityTime>> {
    state
        .world_clock
        .city_time(&city)
        .map(Json)
        .ok_or(ClockError::CityNotFound(city))
}

pub async fn env_clock_selected(State(state): State<AppState>) -> Json<EnvReport> {
    Json(state.env_clock.report_selected().await)
}

pub async fn env_clock_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Json<EnvReport> {
    Json(state.env_clock.report(&city).await)
}

/// Remember a city for `GET /api/envclock` and report on it.
/// An empty or missing city selects the configured default.
pub async fn env_clock_select(
    State(state): State<AppState>,
    body: Option<Json<SelectCityRequest>>,
) -> Json<EnvReport> {
    let requested = body
        .and_then(|Json(b)| b.city)
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.config.env_clock.default_city.clone());

    let city = state.env_clock.select_city(&requested);
    info!("Environment clock city set to {}", city);
    Json(state.env_clock.report(&city).await)
}
