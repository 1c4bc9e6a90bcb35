//! API routes configuration

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use common::logging::http_request_logger;
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{debug, warn};

use super::alarms::*;
use super::clocks::*;
use super::models::HealthResponse;
use super::timing::*;
use crate::world_clock::utc_from_millis;
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: state.config.service.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: utc_from_millis(state.now_millis()).to_rfc3339(),
    })
}

async fn not_found() -> impl IntoResponse {
    let status = StatusCode::NOT_FOUND;
    (
        status,
        Json(json!({
            "error": "Not found",
            "status": status.as_u16()
        })),
    )
}

/// Create the service router: JSON API plus the static frontend.
///
/// Collection roots answer with and without a trailing slash; the bundled
/// frontend requests the slashed form.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        // Alarms
        .route("/api/alarms", get(list_alarms).post(create_alarm))
        .route("/api/alarms/", get(list_alarms).post(create_alarm))
        .route("/api/alarms/count", get(count_alarms))
        .route("/api/alarms/structure", get(alarm_structure))
        .route("/api/alarms/next", get(next_alarm))
        .route("/api/alarms/prev", get(prev_alarm))
        .route("/api/alarms/current", get(current_alarm))
        .route("/api/alarms/reset", post(reset_navigation))
        .route(
            "/api/alarms/{id}",
            get(get_alarm).put(update_alarm).delete(delete_alarm),
        )
        // Stopwatch
        .route("/api/stopwatch", get(stopwatch_state))
        .route("/api/stopwatch/", get(stopwatch_state))
        .route("/api/stopwatch/start", post(stopwatch_start))
        .route("/api/stopwatch/stop", post(stopwatch_stop))
        .route("/api/stopwatch/reset", post(stopwatch_reset))
        // Countdown timer
        .route("/api/timer", get(timer_state))
        .route("/api/timer/", get(timer_state))
        .route("/api/timer/start", post(timer_start))
        .route("/api/timer/stop", post(timer_stop))
        .route("/api/timer/reset", post(timer_reset))
        // World clock
        .route("/api/worldclock", get(world_clock_all))
        .route("/api/worldclock/", get(world_clock_all))
        .route("/api/worldclock/cities", get(world_clock_cities))
        .route("/api/worldclock/{city}", get(world_clock_city))
        // Environment clock
        .route("/api/envclock", get(env_clock_selected))
        .route("/api/envclock/", get(env_clock_selected))
        .route("/api/envclock/set", post(env_clock_select))
        .route("/api/envclock/{city}", get(env_clock_city));

    let frontend = &state.config.frontend;
    let app = if frontend.enabled {
        let index = frontend.index_path();
        if !index.exists() {
            warn!("Frontend index {} not found", index.display());
        }
        debug!("Serving frontend from {}", frontend.static_dir.display());
        api.fallback_service(ServeDir::new(&frontend.static_dir).fallback(ServeFile::new(index)))
    } else {
        api.fallback(not_found)
    };

    app.layer(middleware::from_fn(http_request_logger))
        .with_state(state)
}
