//! Shared service plumbing for the reloj services
//!
//! - layered configuration loading (defaults, environment, YAML)
//! - console logging and the HTTP access-log middleware
//! - graceful shutdown signal handling
//! - an injectable wall clock

pub mod config_loader;
pub mod logging;
pub mod shutdown;
pub mod time;

pub use config_loader::{ConfigError, ConfigLoader};
pub use time::{ManualTimeProvider, SystemTimeProvider, TimeProvider};
