//! Weather lookups: Open-Meteo current conditions, plus a seeded simulation
//! used whenever the upstream is disabled or unreachable.

use std::time::Duration;

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClockError, Result};
use crate::world_clock::City;

/// Current conditions for one city, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    /// Short condition family, e.g. `sunny`, `rainy`
    pub weather: String,
    pub weather_emoji: String,
    pub description: String,
    /// `21°C`
    pub temperature: String,
    /// `55%`
    pub humidity: String,
    /// `12 km/h`
    pub wind_speed: String,
    pub success: bool,
    pub fallback: bool,
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn current(&self, city: &City) -> Result<WeatherReport>;
}

/// Map a WMO weather code to (family, description, emoji)
pub fn describe_weather_code(code: u16) -> (&'static str, &'static str, &'static str) {
    match code {
        0 => ("sunny", "Clear sky", "☀️"),
        1 => ("sunny", "Mainly clear", "🌤️"),
        2 => ("partly cloudy", "Partly cloudy", "⛅"),
        3 => ("cloudy", "Overcast", "☁️"),
        45 | 48 => ("foggy", "Fog", "🌫️"),
        51 | 53 | 55 => ("drizzle", "Drizzle", "🌦️"),
        56 | 57 => ("drizzle", "Freezing drizzle", "🌦️"),
        61 | 63 | 65 => ("rainy", "Rain", "🌧️"),
        66 | 67 => ("rainy", "Freezing rain", "🌧️"),
        71 | 73 | 75 | 77 => ("snowy", "Snow", "❄️"),
        80..=82 => ("rainy", "Rain showers", "🌧️"),
        85 | 86 => ("snowy", "Snow showers", "❄️"),
        95 => ("stormy", "Thunderstorm", "⛈️"),
        96 | 99 => ("stormy", "Thunderstorm with hail", "⛈️"),
        _ => ("variable", "Variable", "❔"),
    }
}

/// Open-Meteo forecast API, `current=` block only
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    weather_code: u16,
}

impl OpenMeteoClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Standalone client with its own request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, base_url))
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    fn name(&self) -> &'static str {
        "open-meteo"
    }

    async fn current(&self, city: &City) -> Result<WeatherReport> {
        let url = format!("{}/v1/forecast", self.base_url);
        debug!("Requesting weather for {} from {}", city.name, url);

        let response: ForecastResponse = self
            .client
            .get(&url)
            .query(&[
                ("latitude", city.latitude.to_string()),
                ("longitude", city.longitude.to_string()),
                (
                    "current",
                    "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code".to_string(),
                ),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let current = response.current.ok_or_else(|| {
            ClockError::UpstreamPayload(format!("no current conditions for {}", city.name))
        })?;
        let (family, description, emoji) = describe_weather_code(current.weather_code);

        Ok(WeatherReport {
            city: city.name.to_string(),
            weather: family.to_string(),
            weather_emoji: emoji.to_string(),
            description: description.to_string(),
            temperature: format!("{}°C", current.temperature_2m.round() as i64),
            humidity: format!("{}%", current.relative_humidity_2m.round() as i64),
            wind_speed: format!("{} km/h", current.wind_speed_10m.round() as i64),
            success: true,
            fallback: false,
        })
    }
}

struct Profile {
    weather: &'static str,
    emoji: &'static str,
    temp_range: (i32, i32),
}

const fn profile(weather: &'static str, emoji: &'static str, low: i32, high: i32) -> Profile {
    Profile {
        weather,
        emoji,
        temp_range: (low, high),
    }
}

const MADRID: &[Profile] = &[
    profile("sunny", "☀️", 15, 25),
    profile("partly cloudy", "⛅", 12, 20),
    profile("cloudy", "☁️", 8, 18),
];
const LONDON: &[Profile] = &[
    profile("cloudy", "☁️", 8, 15),
    profile("rainy", "🌧️", 5, 12),
    profile("partly cloudy", "⛅", 10, 16),
];
const CAIRO: &[Profile] = &[
    profile("sunny", "☀️", 25, 35),
    profile("partly cloudy", "⛅", 22, 30),
];
const SYDNEY: &[Profile] = &[
    profile("sunny", "☀️", 18, 28),
    profile("partly cloudy", "⛅", 15, 25),
    profile("rainy", "🌧️", 12, 20),
];
const GENERIC: &[Profile] = &[
    profile("sunny", "☀️", 18, 25),
    profile("cloudy", "☁️", 15, 22),
    profile("partly cloudy", "⛅", 16, 24),
];

fn profiles_for(city: &str) -> &'static [Profile] {
    match city {
        "Madrid" => MADRID,
        "London" => LONDON,
        "Cairo" => CAIRO,
        "Sydney" => SYDNEY,
        _ => GENERIC,
    }
}

/// FNV-1a, so the seed is stable across builds and platforms
fn city_seed(city: &str) -> u64 {
    city.to_lowercase().bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Plausible weather that stays stable for a city within one hour
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedWeather;

impl SimulatedWeather {
    pub fn generate(&self, city: &str, now_ms: i64) -> WeatherReport {
        let hour_bucket = now_ms.div_euclid(3_600_000) as u64;
        let mut rng = StdRng::seed_from_u64(city_seed(city) ^ hour_bucket);

        let profiles = profiles_for(city);
        let picked = &profiles[rng.gen_range(0..profiles.len())];
        let temperature = rng.gen_range(picked.temp_range.0..=picked.temp_range.1);
        let humidity = rng.gen_range(40..=80);
        let wind = rng.gen_range(5..=25);

        WeatherReport {
            city: city.to_string(),
            weather: picked.weather.to_string(),
            weather_emoji: picked.emoji.to_string(),
            description: format!("{} (simulated)", picked.weather),
            temperature: format!("{}°C", temperature),
            humidity: format!("{}%", humidity),
            wind_speed: format!("{} km/h", wind),
            success: false,
            fallback: true,
        }
    }
}
