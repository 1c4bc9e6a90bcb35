//! Alarms kept in a circular ring with a navigation cursor

mod id;
mod model;
mod store;

pub use id::AlarmIdGenerator;
pub use model::{validate_time, Alarm, AlarmPatch, NewAlarm};
pub use store::AlarmStore;
