//! Utility functions shared by the pipeline stages.
//!
//! This module provides:
//! - A bounded worker pool with a completion barrier
//! - Stage timing metrics

mod pool;
mod timing;

pub use pool::run_bounded;
pub use timing::{duration_to_ms, StageTimings};
