//! Clock Service (ClockSrv)
//!
//! Alarms kept in a navigable circular ring, a stopwatch, a countdown timer,
//! an offline world clock and an environment clock (local time plus weather),
//! all served over one axum router alongside the static frontend.

pub mod alarm;
pub mod api;
pub mod config;
pub mod env_clock;
pub mod error;
pub mod stopwatch;
pub mod timer;
pub mod world_clock;

use std::sync::Arc;

use common::TimeProvider;
use parking_lot::Mutex;

pub use config::ClockConfig;
pub use error::{ClockError, Result};

use alarm::{AlarmIdGenerator, AlarmStore};
use env_clock::EnvClockService;
use stopwatch::Stopwatch;
use timer::CountdownTimer;
use world_clock::WorldClock;

/// Application state shared by every handler
///
/// The synchronous locks are never held across an `.await`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClockConfig>,
    pub clock: Arc<dyn TimeProvider>,
    pub alarms: Arc<Mutex<AlarmStore>>,
    pub alarm_ids: Arc<AlarmIdGenerator>,
    pub stopwatch: Arc<Mutex<Stopwatch>>,
    pub timer: Arc<Mutex<CountdownTimer>>,
    pub world_clock: Arc<WorldClock>,
    pub env_clock: Arc<EnvClockService>,
}

impl AppState {
    /// Build state from configuration, wiring remote lookups when enabled
    pub fn new(config: ClockConfig, clock: Arc<dyn TimeProvider>) -> Result<Self> {
        let world_clock = Arc::new(WorldClock::new(clock.clone()));
        let env_clock =
            EnvClockService::from_config(&config.env_clock, world_clock.clone(), clock.clone())?;
        Ok(Self::with_env_clock(config, clock, world_clock, env_clock))
    }

    /// Build state around an already assembled environment clock
    pub fn with_env_clock(
        config: ClockConfig,
        clock: Arc<dyn TimeProvider>,
        world_clock: Arc<WorldClock>,
        env_clock: EnvClockService,
    ) -> Self {
        Self {
            config: Arc::new(config),
            clock,
            alarms: Arc::new(Mutex::new(AlarmStore::new())),
            alarm_ids: Arc::new(AlarmIdGenerator::new()),
            stopwatch: Arc::new(Mutex::new(Stopwatch::new())),
            timer: Arc::new(Mutex::new(CountdownTimer::new())),
            world_clock,
            env_clock: Arc::new(env_clock),
        }
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }
}
