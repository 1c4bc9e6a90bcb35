//! Navigation-aware alarm store
//!
//! Thin facade over [`CircularList`]: it turns the ring's `Option`/`bool`
//! signals into [`ClockError`]s and hands out owned copies so callers never
//! hold a borrow into the ring.

use reloj_ring::{CircularList, RingStructure};
use tracing::{debug, info};

use super::model::{Alarm, AlarmPatch};
use crate::error::{ClockError, Result};

#[derive(Debug, Default)]
pub struct AlarmStore {
    ring: CircularList<Alarm>,
}

impl AlarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All alarms in ring order, starting at the head
    pub fn list(&self) -> Vec<Alarm> {
        self.ring.to_vec()
    }

    pub fn count(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Append at the tail; the first alarm also becomes the cursor
    pub fn add(&mut self, alarm: Alarm) -> Alarm {
        info!("Alarm created: id={} time={}", alarm.id, alarm.time);
        self.ring.insert_at_end(alarm.clone());
        alarm
    }

    pub fn get(&self, id: i64) -> Result<Alarm> {
        self.ring
            .search_by_id(&id)
            .cloned()
            .ok_or(ClockError::AlarmNotFound(id))
    }

    /// Merge `patch` into alarm `id` and return the result
    pub fn update(&mut self, id: i64, patch: AlarmPatch) -> Result<Alarm> {
        debug!("Updating alarm {}: {:?}", id, patch);
        if !self.ring.update_by_id(&id, patch) {
            return Err(ClockError::AlarmNotFound(id));
        }
        self.get(id)
    }

    pub fn delete(&mut self, id: i64) -> Result<Alarm> {
        let removed = self
            .ring
            .remove_by_id(&id)
            .ok_or(ClockError::AlarmNotFound(id))?;
        info!("Alarm deleted: id={}", id);
        Ok(removed)
    }

    pub fn next(&mut self) -> Result<Alarm> {
        let alarm = self.ring.next_item().cloned().ok_or(ClockError::NoAlarms)?;
        debug!("Cursor moved forward to {}", alarm.id);
        Ok(alarm)
    }

    pub fn prev(&mut self) -> Result<Alarm> {
        let alarm = self.ring.prev_item().cloned().ok_or(ClockError::NoAlarms)?;
        debug!("Cursor moved backward to {}", alarm.id);
        Ok(alarm)
    }

    pub fn current(&self) -> Result<Alarm> {
        self.ring.current().cloned().ok_or(ClockError::NoAlarms)
    }

    /// Put the cursor back on the head
    pub fn reset(&mut self) -> Result<Alarm> {
        let alarm = self
            .ring
            .reset_current()
            .cloned()
            .ok_or(ClockError::NoAlarms)?;
        debug!("Cursor reset to head {}", alarm.id);
        Ok(alarm)
    }

    pub fn structure(&self) -> RingStructure {
        self.ring.describe()
    }
}
