//! Pipeline orchestration.
//!
//! Stages run strictly one after another; each one hands its complete,
//! re-sorted output to the next:
//!
//! 1. load and merge sources
//! 2. reachability probe and shortlist
//! 3. throughput qualification
//! 4. ranking (with explicit latency-only fallback)
//! 5. geolocation
//! 6. reports

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::app::{print_error_statistics, print_timing_statistics};
use crate::config::Config;
use crate::error_handling::{InitializationError, PipelineError, ProcessingStats};
use crate::export::{log_leaderboard, write_reports};
use crate::geoip::{CountryLookup, GeoLocator, IpApiLookup};
use crate::initialization::init_client;
use crate::models::{FinalNode, SelectionMode};
use crate::probe::{run_reachability_stage, Connector, Prober, TcpConnector};
use crate::qualify::{Downloader, HttpDownloader, Qualifier};
use crate::rank::select;
use crate::sources::{load_sources, normalize};
use crate::utils::{duration_to_ms, StageTimings};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Unique candidates after merging every source
    pub merged: usize,
    /// Candidates passing the latency/loss gate
    pub quick_qualified: usize,
    /// Candidates sent to throughput testing
    pub shortlisted: usize,
    /// Whether the nodes passed the throughput test or are the latency fallback
    pub selection_mode: SelectionMode,
    /// Final nodes in report order
    pub nodes: Vec<FinalNode>,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
    pub txt_path: PathBuf,
    pub csv_path: PathBuf,
}

/// The full run with its network collaborators.
pub struct Pipeline {
    config: Config,
    client: reqwest::Client,
    connector: Arc<dyn Connector>,
    downloader: Arc<dyn Downloader>,
    lookup: Arc<dyn CountryLookup>,
}

impl Pipeline {
    /// Builds a pipeline around caller-supplied collaborators.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the shared HTTP
    /// client (used for the override URL) cannot be built.
    pub fn new(
        config: Config,
        connector: Arc<dyn Connector>,
        downloader: Arc<dyn Downloader>,
        lookup: Arc<dyn CountryLookup>,
    ) -> Result<Self, InitializationError> {
        let client = init_client(&config)?;
        Ok(Self {
            config,
            client,
            connector,
            downloader,
            lookup,
        })
    }

    /// Builds a pipeline with the real TCP, HTTP, and ip-api collaborators.
    pub fn from_config(config: Config) -> Result<Self, InitializationError> {
        let client = init_client(&config)?;
        let geo = config.geo_settings();
        let lookup = IpApiLookup::new(client, geo.api_url, geo.timeout);
        let downloader = HttpDownloader::new(config.user_agent.clone());
        Self::new(
            config,
            Arc::new(TcpConnector),
            Arc::new(downloader),
            Arc::new(lookup),
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every stage and writes both reports.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::NoInput` when every source is empty, or an
    /// error if the reports cannot be written. No report file is touched in
    /// either case.
    pub async fn run(&self) -> Result<RunReport> {
        let start_time = Instant::now();
        let stats = Arc::new(ProcessingStats::new());
        let thresholds = self.config.thresholds();
        let mut timings = StageTimings::default();

        let stage = Instant::now();
        let blobs = load_sources(&self.config, &self.client, &stats).await;
        let candidates = normalize(&blobs);
        timings.load_ms = duration_to_ms(stage.elapsed());
        if candidates.is_empty() {
            print_error_statistics(&stats);
            return Err(PipelineError::NoInput.into());
        }
        let merged = candidates.len();
        info!(
            "Merged {} unique candidates from {} sources",
            merged,
            blobs.iter().filter(|b| !b.entries.is_empty()).count()
        );

        let stage = Instant::now();
        let prober = Prober::new(
            Arc::clone(&self.connector),
            self.config.probe_settings(),
            Arc::clone(&stats),
        );
        let probe = run_reachability_stage(&prober, candidates, &thresholds).await;
        timings.probe_ms = duration_to_ms(stage.elapsed());

        let stage = Instant::now();
        let qualifier = Qualifier::new(
            prober,
            Arc::clone(&self.downloader),
            self.config.speedtest_settings(),
            thresholds,
            Arc::clone(&stats),
        );
        let results = qualifier.qualify_all(probe.shortlist.clone()).await;
        timings.qualify_ms = duration_to_ms(stage.elapsed());

        let selection = select(
            &results,
            &probe.quick_qualified,
            self.config.max_output_nodes,
        );

        let stage = Instant::now();
        let locator = GeoLocator::new(
            Arc::clone(&self.lookup),
            self.config.geo_settings(),
            Arc::clone(&stats),
        );
        let nodes = locator.annotate(&selection).await;
        timings.geolocate_ms = duration_to_ms(stage.elapsed());

        let stage = Instant::now();
        write_reports(
            &self.config.output_txt,
            &self.config.output_csv,
            &nodes,
            selection.mode,
            &thresholds,
        )
        .context("Failed to write reports")?;
        timings.report_ms = duration_to_ms(stage.elapsed());

        log_leaderboard(&nodes);
        print_error_statistics(&stats);
        print_timing_statistics(&timings);

        Ok(RunReport {
            merged,
            quick_qualified: probe.quick_qualified.len(),
            shortlisted: probe.shortlist.len(),
            selection_mode: selection.mode,
            nodes,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
            txt_path: self.config.output_txt.clone(),
            csv_path: self.config.output_csv.clone(),
        })
    }
}

/// Runs the pipeline with the real network collaborators.
///
/// # Example
///
/// ```no_run
/// use endpoint_qualifier::{run_pipeline, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     primary: vec![PathBuf::from("ip/ip.txt")],
///     ..Default::default()
/// };
/// let report = run_pipeline(config).await?;
/// println!("{} nodes ({})", report.nodes.len(), report.selection_mode.as_str());
/// # Ok(())
/// # }
/// ```
pub async fn run_pipeline(config: Config) -> Result<RunReport> {
    let pipeline = Pipeline::from_config(config).context("Failed to initialize pipeline")?;
    pipeline.run().await
}
