//! Layered configuration loader
//!
//! Priority, lowest to highest:
//! 1. defaults (`T::default()` or [`ConfigLoader::with_defaults`])
//! 2. environment variables under a prefix
//! 3. a YAML file
//!
//! Environment keys map onto the config tree with `__` between segments, so
//! field names may keep their underscores: `CLOCKSRV__ENV_CLOCK__DEFAULT_CITY`
//! sets `env_clock.default_city`.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use tracing::{debug, info};

const PATH_SEPARATOR: &str = "__";

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON conversion error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Builder that merges defaults, environment and YAML into `T`
pub struct ConfigLoader<T>
where
    T: Default + DeserializeOwned + Serialize,
{
    defaults: T,
    env_prefix: Option<String>,
    yaml_path: Option<PathBuf>,
    /// Fail instead of skipping when the YAML file is missing
    require_file: bool,
}

impl<T> Default for ConfigLoader<T>
where
    T: Default + DeserializeOwned + Serialize,
{
    fn default() -> Self {
        Self {
            defaults: T::default(),
            env_prefix: None,
            yaml_path: None,
            require_file: false,
        }
    }
}

impl<T> ConfigLoader<T>
where
    T: Default + DeserializeOwned + Serialize,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(mut self, defaults: T) -> Self {
        self.defaults = defaults;
        self
    }

    /// Read `<PREFIX>__section__field` variables
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Optional YAML overlay; skipped when the file does not exist
    pub fn with_yaml_file(mut self, path: impl AsRef<Path>) -> Self {
        self.yaml_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// YAML overlay that must exist
    pub fn with_required_yaml_file(mut self, path: impl AsRef<Path>) -> Self {
        self.yaml_path = Some(path.as_ref().to_path_buf());
        self.require_file = true;
        self
    }

    pub fn build(self) -> Result<T> {
        let mut config_json = serde_json::to_value(&self.defaults)?;
        debug!("Starting from default configuration");

        if let Some(prefix) = &self.env_prefix {
            debug!("Applying environment variables, prefix: {}", prefix);
            apply_env_vars(&mut config_json, prefix, env::vars());
        }

        if let Some(yaml_path) = &self.yaml_path {
            if yaml_path.exists() {
                info!("Loading YAML config file: {}", yaml_path.display());
                let yaml_content =
                    std::fs::read_to_string(yaml_path).map_err(|source| ConfigError::Io {
                        path: yaml_path.clone(),
                        source,
                    })?;
                let yaml_value: YamlValue = serde_yaml::from_str(&yaml_content)?;
                // An empty file parses to null; treat it as "no overrides"
                if !yaml_value.is_null() {
                    let overlay: JsonValue = serde_yaml::from_value(yaml_value)?;
                    merge_json_values(&mut config_json, &overlay);
                }
            } else if self.require_file {
                return Err(ConfigError::NotFound(yaml_path.clone()));
            } else {
                debug!("YAML config file not found, skipping: {}", yaml_path.display());
            }
        }

        Ok(serde_json::from_value(config_json)?)
    }
}

fn apply_env_vars<I>(config: &mut JsonValue, prefix: &str, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let marker = format!("{}{}", prefix, PATH_SEPARATOR);
    let env_vars: HashMap<String, String> = vars
        .into_iter()
        .filter(|(k, _)| k.starts_with(&marker))
        .collect();

    for (key, value) in env_vars {
        let segments: Vec<String> = key[marker.len()..]
            .split(PATH_SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect();

        if !segments.is_empty() {
            debug!(
                "Applying environment variable {} to path {}",
                key,
                segments.join(".")
            );
            set_value_by_path(config, &segments, &value);
        }
    }
}

fn merge_json_values(base: &mut JsonValue, overlay: &JsonValue) {
    match (base, overlay) {
        (JsonValue::Object(base_map), JsonValue::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => merge_json_values(base_value, overlay_value),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    },
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
        },
    }
}

fn set_value_by_path(config: &mut JsonValue, segments: &[String], value: &str) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = config;
    for part in parents {
        let JsonValue::Object(map) = current else {
            return;
        };
        current = map
            .entry(part.clone())
            .or_insert_with(|| JsonValue::Object(serde_json::Map::new()));
    }

    if let JsonValue::Object(map) = current {
        map.insert(last.clone(), parse_env_value(value));
    }
}

/// Best-effort typing of an environment value: bool, integer, float, string
fn parse_env_value(value: &str) -> JsonValue {
    if let Ok(bool_val) = value.parse::<bool>() {
        return JsonValue::Bool(bool_val);
    }

    if let Ok(int_val) = value.parse::<i64>() {
        return JsonValue::Number(serde_json::Number::from(int_val));
    }

    if let Ok(float_val) = value.parse::<f64>() {
        if let Some(num) = serde_json::Number::from_f64(float_val) {
            return JsonValue::Number(num);
        }
    }

    JsonValue::String(value.to_string())
}
