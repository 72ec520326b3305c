//! Weather enrichment for FlightOnTime
//!
//! Looks up route weather for a scheduled departure. Failures never reach the
//! caller; a fallback record is returned instead.

pub mod client;
pub mod types;

pub use client::WeatherClient;
pub use types::*;
