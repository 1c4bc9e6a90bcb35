//! ClockSrv configuration
//!
//! Loaded through [`common::ConfigLoader`]: defaults, then `CLOCKSRV__*`
//! environment variables, then the YAML file.

use std::path::{Path, PathBuf};

use common::logging::LogConfig;
use common::ConfigLoader;
use serde::{Deserialize, Serialize};

use crate::error::{ClockError, Result};

/// Environment prefix, e.g. `CLOCKSRV__API__PORT=8080`
pub const ENV_PREFIX: &str = "CLOCKSRV";

/// Default config file location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/clocksrv.yaml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClockConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub env_clock: EnvClockConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default)]
    pub log: LogConfig,
}

/// HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl ApiConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Static single-page frontend served for every non-API path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrontendConfig {
    pub enabled: bool,
    pub static_dir: PathBuf,
    #[serde(default = "default_index_file")]
    pub index_file: String,
}

impl FrontendConfig {
    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }
}

/// Environment clock: upstream lookups and cache lifetimes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvClockConfig {
    pub default_city: String,
    /// Query timeapi.io / Open-Meteo before falling back to offline data
    pub remote_lookup: bool,
    pub request_timeout_ms: u64,
    pub weather_cache_secs: u64,
    pub time_cache_secs: u64,
    pub open_meteo_url: String,
    pub time_api_url: String,
}

fn default_index_file() -> String {
    "index.html".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "clocksrv".to_string(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            static_dir: PathBuf::from("frontend/public"),
            index_file: default_index_file(),
        }
    }
}

impl Default for EnvClockConfig {
    fn default() -> Self {
        Self {
            default_city: "Madrid".to_string(),
            remote_lookup: true,
            request_timeout_ms: 3000,
            weather_cache_secs: 300,
            time_cache_secs: 30,
            open_meteo_url: "https://api.open-meteo.com".to_string(),
            time_api_url: "https://timeapi.io".to_string(),
        }
    }
}

impl ClockConfig {
    /// Load from `path` (optional file) plus `CLOCKSRV__*` overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = ConfigLoader::new()
            .with_env_prefix(ENV_PREFIX)
            .with_yaml_file(path)
            .build()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.port == 0 {
            return Err(ClockError::Config("api.port must be non-zero".to_string()));
        }
        if self.env_clock.default_city.trim().is_empty() {
            return Err(ClockError::Config(
                "env_clock.default_city must not be empty".to_string(),
            ));
        }
        if self.env_clock.request_timeout_ms == 0 {
            return Err(ClockError::Config(
                "env_clock.request_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Render as YAML, e.g. for `clocksrv check`
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ClockError::Internal(e.to_string()))
    }
}
