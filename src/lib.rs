//! endpoint_qualifier library: find the best-performing endpoints in a
//! candidate list.
//!
//! Candidate `address[:port]` lists are merged, screened with cheap TCP
//! connect probes, the best of those are download-tested through, and the
//! fastest nodes are annotated with a country code and written out as a
//! plain `address:port#CC` list plus a CSV with the measurements.
//!
//! # Example
//!
//! ```no_run
//! use endpoint_qualifier::{run_pipeline, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     primary: vec![PathBuf::from("ip/ip.txt")],
//!     override_url: Some("https://example.com/diy.txt".to_string()),
//!     max_output_nodes: 10,
//!     ..Default::default()
//! };
//!
//! let report = run_pipeline(config).await?;
//! println!("{} of {} candidates selected", report.nodes.len(), report.merged);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

mod app;
pub mod config;
pub mod error_handling;
pub mod export;
pub mod geoip;
pub mod initialization;
pub mod models;
pub mod probe;
pub mod qualify;
pub mod rank;
mod run;
pub mod sources;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::PipelineError;
pub use geoip::{CountryLookup, GeoLocator, IpApiLookup};
pub use models::{Candidate, CountryCode, FinalNode, SelectionMode};
pub use probe::{Connector, TcpConnector};
pub use qualify::{DownloadSample, Downloader, HttpDownloader};
pub use run::{run_pipeline, Pipeline, RunReport};
