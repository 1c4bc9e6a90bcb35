//! Error types for ClockSrv
//!
//! Every handler returns [`Result`]; the error renders itself as
//! `{"error": message, "status": code}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClockError>;

#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// No alarm carries this id
    #[error("Alarm not found: {0}")]
    AlarmNotFound(i64),

    /// Navigation attempted on an empty ring
    #[error("No alarms")]
    NoAlarms,

    #[error("City not available: {0}")]
    CityNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Time or weather lookup failed at the transport level
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Upstream answered, but not with something usable
    #[error("Unexpected upstream response: {0}")]
    UpstreamPayload(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    ConfigLoad(#[from] common::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ClockError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ClockError::AlarmNotFound(_) | ClockError::NoAlarms | ClockError::CityNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            },
            ClockError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ClockError::Upstream(_) | ClockError::UpstreamPayload(_) => (
                StatusCode::BAD_GATEWAY,
                "Upstream service error".to_string(),
            ),
            ClockError::Config(_) | ClockError::ConfigLoad(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            ClockError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Unreadable request bodies answer in the same JSON shape as every other error
impl From<JsonRejection> for ClockError {
    fn from(rejection: JsonRejection) -> Self {
        ClockError::InvalidInput(rejection.body_text())
    }
}

/// Helper function to create an invalid input error
pub fn invalid_input(msg: impl Into<String>) -> ClockError {
    ClockError::InvalidInput(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ClockError::AlarmNotFound(1700000000000).to_string(),
            "Alarm not found: 1700000000000"
        );
        assert_eq!(ClockError::NoAlarms.to_string(), "No alarms");
        assert_eq!(
            ClockError::CityNotFound("Atlantis".to_string()).to_string(),
            "City not available: Atlantis"
        );
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ClockError::NoAlarms, StatusCode::NOT_FOUND),
            (ClockError::AlarmNotFound(7), StatusCode::NOT_FOUND),
            (invalid_input("bad time"), StatusCode::BAD_REQUEST),
            (
                ClockError::UpstreamPayload("empty".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ClockError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_internal_details_are_not_leaked() {
        let response = ClockError::Config("secret path /etc/x".to_string()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"], "Configuration error");
        assert_eq!(body["status"], 500);
    }
}
