//! Error handling and failure statistics.
//!
//! This module provides:
//! - Typed errors for each collaborator seam (TCP connect, download, geolocation)
//! - The single run-terminating condition (`PipelineError::NoInput`)
//! - Failure counters keyed by `ErrorType`
//!
//! Per-candidate failures never cross a stage boundary as errors. The stage
//! that observes one counts it here and records sentinel values instead.

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{
    DownloadError, ErrorType, GeoError, InitializationError, PipelineError, ProbeError,
};
