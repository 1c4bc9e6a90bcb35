//! Shared helpers for the ClockSrv integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use clocksrv::api::create_router;
use clocksrv::{AppState, ClockConfig};
use common::ManualTimeProvider;
use serde_json::{json, Value};
use tower::util::ServiceExt;

/// 2025-01-10 12:00:00 UTC
pub const NOON_UTC: i64 = 1_736_510_400_000;

/// Offline config: no upstream lookups, no static frontend
pub fn test_config() -> ClockConfig {
    let mut config = ClockConfig::default();
    config.frontend.enabled = false;
    config.env_clock.remote_lookup = false;
    config
}

pub fn create_test_router_with(config: ClockConfig) -> (Router, Arc<ManualTimeProvider>) {
    let clock = Arc::new(ManualTimeProvider::new(NOON_UTC));
    let state = AppState::new(config, clock.clone()).unwrap();
    (create_router(state), clock)
}

pub fn create_test_router() -> (Router, Arc<ManualTimeProvider>) {
    create_test_router_with(test_config())
}

/// Send one request and decode the JSON reply (`{}` for an empty body)
pub async fn json_request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body = if bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Create an alarm and return its id
pub async fn create_alarm(app: &Router, time: &str, label: &str) -> i64 {
    let (status, body) = json_request(
        app,
        "POST",
        "/api/alarms",
        Some(json!({ "time": time, "label": label })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}
