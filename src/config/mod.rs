//! Application configuration and constants.
//!
//! This module provides:
//! - Default thresholds, limits, timeouts, and benchmark endpoints
//! - The CLI-parsable `Config` and the per-component settings derived from it

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    Config, GeoSettings, LogFormat, LogLevel, ProbeSettings, SpeedTestSettings, Thresholds,
};
