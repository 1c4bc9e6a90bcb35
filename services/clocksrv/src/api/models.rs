//! Request and response bodies that are not domain types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::alarm::Alarm;
use crate::world_clock::CityTime;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: &'static str,
    /// RFC 3339, UTC
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: &'static str,
    pub current: Alarm,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimerStartRequest {
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Serialize)]
pub struct CitiesResponse {
    pub cities: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct WorldClockResponse {
    pub cities: BTreeMap<&'static str, CityTime>,
    pub success: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SelectCityRequest {
    pub city: Option<String>,
}
