//! Environment clock
//!
//! Combines the local time of a city with its current weather and a day/night
//! flag. Each half resolves independently through a short-lived cache, an
//! optional remote source and finally an offline fallback, so a report is
//! always produced.

pub mod time_source;
pub mod weather;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use common::TimeProvider;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::EnvClockConfig;
use crate::error::Result;
use crate::world_clock::{find_city, format_utc_offset, utc_from_millis, City, CityTime, WorldClock};

pub use time_source::{RemoteTime, TimeApiClient, TimeSource};
pub use weather::{OpenMeteoClient, SimulatedWeather, WeatherReport, WeatherSource};

/// Response of `/api/envclock`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvReport {
    pub city: String,
    pub time: String,
    pub date: String,
    pub timezone: String,
    pub is_day: bool,
    pub weather: String,
    pub weather_emoji: String,
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
    pub description: String,
    pub time_success: bool,
    pub weather_success: bool,
}

#[derive(Debug, Clone)]
struct Cached<T> {
    value: T,
    stored_at_ms: i64,
}

impl<T> Cached<T> {
    fn fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms - self.stored_at_ms < ttl_ms
    }
}

pub struct EnvClockService {
    world: Arc<WorldClock>,
    clock: Arc<dyn TimeProvider>,
    weather_source: Option<Arc<dyn WeatherSource>>,
    time_source: Option<Arc<dyn TimeSource>>,
    simulated: SimulatedWeather,
    weather_cache: DashMap<String, Cached<WeatherReport>>,
    time_cache: DashMap<String, Cached<RemoteTime>>,
    weather_ttl_ms: i64,
    time_ttl_ms: i64,
    selected_city: RwLock<String>,
}

impl EnvClockService {
    /// Offline service: world clock time and simulated weather only
    pub fn new(
        settings: &EnvClockConfig,
        world: Arc<WorldClock>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            world,
            clock,
            weather_source: None,
            time_source: None,
            simulated: SimulatedWeather,
            weather_cache: DashMap::new(),
            time_cache: DashMap::new(),
            weather_ttl_ms: secs_to_ms(settings.weather_cache_secs),
            time_ttl_ms: secs_to_ms(settings.time_cache_secs),
            selected_city: RwLock::new(settings.default_city.trim().to_string()),
        }
    }

    /// Service wired to Open-Meteo and timeapi.io when `remote_lookup` is on
    pub fn from_config(
        settings: &EnvClockConfig,
        world: Arc<WorldClock>,
        clock: Arc<dyn TimeProvider>,
    ) -> Result<Self> {
        let service = Self::new(settings, world, clock);
        if !settings.remote_lookup {
            debug!("Remote lookups disabled, environment clock runs offline");
            return Ok(service);
        }

        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_millis(settings.request_timeout_ms))
            .build()?;
        Ok(service
            .with_weather_source(Arc::new(OpenMeteoClient::new(
                client.clone(),
                settings.open_meteo_url.as_str(),
            )))
            .with_time_source(Arc::new(TimeApiClient::new(
                client,
                settings.time_api_url.as_str(),
            ))))
    }

    pub fn with_weather_source(mut self, source: Arc<dyn WeatherSource>) -> Self {
        self.weather_source = Some(source);
        self
    }

    pub fn with_time_source(mut self, source: Arc<dyn TimeSource>) -> Self {
        self.time_source = Some(source);
        self
    }

    /// City served by `GET /api/envclock`
    pub fn selected_city(&self) -> String {
        self.selected_city.read().clone()
    }

    /// Remember `name` as the default city and return the stored name.
    /// Known cities are stored under their canonical spelling.
    pub fn select_city(&self, name: &str) -> String {
        let name = find_city(name)
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| name.trim().to_string());
        *self.selected_city.write() = name.clone();
        name
    }

    pub async fn report_selected(&self) -> EnvReport {
        let city = self.selected_city();
        self.report(&city).await
    }

    pub async fn report(&self, name: &str) -> EnvReport {
        let city = find_city(name);
        let display = city
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| name.trim().to_string());

        let (time, weather) = tokio::join!(
            self.resolve_time(&display, city),
            self.resolve_weather(&display, city)
        );
        let is_day = time.hour().is_some_and(|h| (6..18).contains(&h));

        EnvReport {
            city: display,
            time: time.time,
            date: time.date,
            timezone: time.timezone,
            is_day,
            weather: weather.weather,
            weather_emoji: weather.weather_emoji,
            temperature: weather.temperature,
            humidity: weather.humidity,
            wind_speed: weather.wind_speed,
            description: weather.description,
            time_success: time.success,
            weather_success: weather.success,
        }
    }

    async fn resolve_time(&self, name: &str, city: Option<&City>) -> CityTime {
        let now = self.clock.now_millis();
        let Some(city) = city else {
            return CityTime::utc_fallback(name, utc_from_millis(now));
        };

        if let Some(time) = self.cached_time(city, now) {
            return time;
        }

        if let Some(source) = &self.time_source {
            match source.current(city).await {
                Ok(remote) => {
                    let now = self.clock.now_millis();
                    let time = render_remote(city, &remote, 0, now);
                    self.time_cache.insert(
                        cache_key(city.name),
                        Cached {
                            value: remote,
                            stored_at_ms: now,
                        },
                    );
                    return time;
                },
                Err(e) => warn!("Time lookup via {} failed for {}: {}", source.name(), city.name, e),
            }
        }

        self.world.time_in(city)
    }

    /// Cached remote time, advanced by the age of the entry
    fn cached_time(&self, city: &City, now_ms: i64) -> Option<CityTime> {
        let entry = self.time_cache.get(&cache_key(city.name))?;
        if !entry.fresh(now_ms, self.time_ttl_ms) {
            return None;
        }
        let age_ms = now_ms - entry.stored_at_ms;
        Some(render_remote(city, &entry.value, age_ms, now_ms))
    }

    /// Only cities from the fixed table are cached; anything else is simulated
    /// on every request.
    async fn resolve_weather(&self, name: &str, city: Option<&City>) -> WeatherReport {
        let now = self.clock.now_millis();
        let Some(city) = city else {
            return self.simulated.generate(name, now);
        };

        let key = cache_key(city.name);
        if let Some(report) = self.cached_weather(&key, now) {
            return report;
        }

        if let Some(source) = &self.weather_source {
            match source.current(city).await {
                Ok(report) => {
                    self.store_weather(key, report.clone());
                    return report;
                },
                Err(e) => warn!(
                    "Weather lookup via {} failed for {}: {}",
                    source.name(),
                    city.name,
                    e
                ),
            }
        }

        let report = self.simulated.generate(city.name, now);
        self.store_weather(key, report.clone());
        report
    }

    fn cached_weather(&self, key: &str, now_ms: i64) -> Option<WeatherReport> {
        let entry = self.weather_cache.get(key)?;
        entry
            .fresh(now_ms, self.weather_ttl_ms)
            .then(|| entry.value.clone())
    }

    fn store_weather(&self, key: String, report: WeatherReport) {
        let now = self.clock.now_millis();
        let ttl = self.weather_ttl_ms;
        self.weather_cache.retain(|_, entry| entry.fresh(now, ttl));
        self.weather_cache.insert(
            key,
            Cached {
                value: report,
                stored_at_ms: now,
            },
        );
    }
}

fn cache_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn secs_to_ms(secs: u64) -> i64 {
    i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX)
}

fn render_remote(city: &City, remote: &RemoteTime, age_ms: i64, now_ms: i64) -> CityTime {
    let local = remote.local + Duration::milliseconds(age_ms);
    CityTime {
        city: city.name.to_string(),
        time: local.format("%H:%M:%S").to_string(),
        date: local.format("%m/%d/%Y").to_string(),
        timezone: remote.timezone.clone(),
        utc_offset: format_utc_offset(city.offset_minutes_at(utc_from_millis(now_ms))),
        success: true,
    }
}
