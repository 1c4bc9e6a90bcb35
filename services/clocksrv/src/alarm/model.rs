use std::fmt;

use chrono::NaiveTime;
use reloj_ring::{Keyed, Merge};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input, Result};

/// A wall-clock alarm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: i64,
    /// Trigger time, `HH:MM`
    pub time: String,
    #[serde(default)]
    pub label: String,
    pub active: bool,
}

impl Alarm {
    pub fn new(id: i64, time: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id,
            time: time.into(),
            label: label.into(),
            active: true,
        }
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.active { "on" } else { "off" };
        write!(f, "#{} {} \"{}\" [{}]", self.id, self.time, self.label, state)
    }
}

impl Keyed for Alarm {
    type Key = i64;

    fn key(&self) -> &i64 {
        &self.id
    }
}

impl Merge for Alarm {
    type Patch = AlarmPatch;

    fn merge(&mut self, patch: AlarmPatch) {
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
    }
}

/// Body of `POST /api/alarms`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAlarm {
    pub time: Option<String>,
    #[serde(default)]
    pub label: String,
}

/// Partial update for an alarm.
///
/// Unknown fields, `id` included, are dropped during deserialization, so a
/// patch can never re-key an alarm.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AlarmPatch {
    pub time: Option<String>,
    pub label: Option<String>,
    pub active: Option<bool>,
}

impl AlarmPatch {
    pub fn validate(&self) -> Result<()> {
        match &self.time {
            Some(time) => validate_time(time),
            None => Ok(()),
        }
    }
}

/// Accept `HH:MM` on a 24-hour clock
pub fn validate_time(time: &str) -> Result<()> {
    let well_formed = time.len() == 5 && NaiveTime::parse_from_str(time, "%H:%M").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(invalid_input(format!(
            "time must be HH:MM (24-hour), got '{}'",
            time
        )))
    }
}
