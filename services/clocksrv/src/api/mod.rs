//! HTTP API

pub mod alarms;
pub mod clocks;
pub mod models;
pub mod routes;
pub mod timing;

pub use routes::create_router;
