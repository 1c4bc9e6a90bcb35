//! Remote wall-clock lookups (timeapi.io)

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClockError, Result};
use crate::world_clock::City;

/// Local wall time reported by an upstream for one zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTime {
    pub local: NaiveDateTime,
    pub timezone: String,
}

#[async_trait]
pub trait TimeSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn current(&self, city: &City) -> Result<RemoteTime>;
}

pub struct TimeApiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZoneTimeResponse {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    seconds: u32,
    #[serde(default)]
    milli_seconds: u32,
    time_zone: Option<String>,
}

impl ZoneTimeResponse {
    fn local(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_milli_opt(
            self.hour,
            self.minute,
            self.seconds,
            self.milli_seconds,
        )
    }
}

impl TimeApiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, base_url))
    }
}

#[async_trait]
impl TimeSource for TimeApiClient {
    fn name(&self) -> &'static str {
        "timeapi.io"
    }

    async fn current(&self, city: &City) -> Result<RemoteTime> {
        let url = format!("{}/api/Time/current/zone", self.base_url);
        debug!("Requesting time for {} from {}", city.timezone, url);

        let response: ZoneTimeResponse = self
            .client
            .get(&url)
            .query(&[("timeZone", city.timezone)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let local = response.local().ok_or_else(|| {
            ClockError::UpstreamPayload(format!(
                "invalid date {}-{}-{} {}:{}:{}",
                response.year,
                response.month,
                response.day,
                response.hour,
                response.minute,
                response.seconds
            ))
        })?;

        Ok(RemoteTime {
            local,
            timezone: response
                .time_zone
                .unwrap_or_else(|| city.timezone.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zone_response() {
        let body = r#"{
            "year": 2025, "month": 3, "day": 2, "hour": 8, "minute": 15,
            "seconds": 4, "milliSeconds": 120, "dateTime": "2025-03-02T08:15:04.12",
            "date": "03/02/2025", "time": "08:15", "timeZone": "Europe/Madrid",
            "dayOfWeek": "Sunday", "dstActive": false
        }"#;
        let parsed: ZoneTimeResponse = serde_json::from_str(body).unwrap();
        let local = parsed.local().unwrap();

        assert_eq!(local.format("%H:%M:%S").to_string(), "08:15:04");
        assert_eq!(parsed.time_zone.as_deref(), Some("Europe/Madrid"));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let parsed = ZoneTimeResponse {
            year: 2025,
            month: 2,
            day: 30,
            hour: 0,
            minute: 0,
            seconds: 0,
            milli_seconds: 0,
            time_zone: None,
        };
        assert!(parsed.local().is_none());
    }
}
