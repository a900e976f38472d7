//! Configuration types and CLI options.
//!
//! `Config` is the single immutable configuration value for a run. Each
//! pipeline component receives only the settings slice it needs, derived
//! from `Config` at construction time.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Run configuration.
///
/// Parsed from the command line by the binary, or constructed programmatically
/// (usually via `..Default::default()`) by library users.
///
/// # Examples
///
/// ```no_run
/// use endpoint_qualifier::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     primary: vec![PathBuf::from("ip.txt")],
///     max_output_nodes: 10,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "endpoint_qualifier",
    version,
    about = "Probe candidate endpoints and keep the fastest ones"
)]
pub struct Config {
    /// Primary source files, merged first (repeatable)
    #[arg(long = "primary", default_value = DEFAULT_PRIMARY_FILE)]
    pub primary: Vec<PathBuf>,

    /// Override source URL; its explicit ports win over primary sources
    #[arg(long)]
    pub override_url: Option<String>,

    /// Override source file, used when the override URL is absent or empty
    #[arg(long)]
    pub override_file: Option<PathBuf>,

    /// Text report path
    #[arg(long, default_value = DEFAULT_OUTPUT_TXT)]
    pub output_txt: PathBuf,

    /// Tabular (CSV) report path
    #[arg(long, default_value = DEFAULT_OUTPUT_CSV)]
    pub output_csv: PathBuf,

    /// Maximum average connect latency in milliseconds
    #[arg(long, default_value_t = MAX_LATENCY_MS)]
    pub max_latency_ms: f64,

    /// Maximum packet loss percentage
    #[arg(long, default_value_t = MAX_PACKET_LOSS_PCT)]
    pub max_packet_loss: f64,

    /// Minimum download speed in MB/s
    #[arg(long, default_value_t = MIN_DOWNLOAD_SPEED_MBPS)]
    pub min_speed_mbps: f64,

    /// Maximum number of nodes in the final output
    #[arg(long, default_value_t = MAX_OUTPUT_NODES)]
    pub max_output_nodes: usize,

    /// Quick-qualified candidates promoted to throughput testing
    #[arg(long, default_value_t = SHORTLIST_SIZE)]
    pub shortlist_size: usize,

    /// TCP connect attempts per candidate
    #[arg(long, default_value_t = PING_COUNT)]
    pub ping_count: usize,

    /// Per-attempt connect timeout in milliseconds
    #[arg(long, default_value_t = PING_TIMEOUT.as_millis() as u64)]
    pub ping_timeout_ms: u64,

    /// Pause between connect attempts in milliseconds
    #[arg(long, default_value_t = PING_PAUSE.as_millis() as u64)]
    pub ping_pause_ms: u64,

    /// Worker pool size for probing and geolocation
    #[arg(long, default_value_t = PROBE_CONCURRENCY)]
    pub probe_concurrency: usize,

    /// Worker pool size for download measurements
    #[arg(long, default_value_t = SPEEDTEST_CONCURRENCY)]
    pub speedtest_concurrency: usize,

    /// Download measurements per candidate
    #[arg(long, default_value_t = SPEEDTEST_ROUNDS)]
    pub speedtest_rounds: usize,

    /// Bytes read per download measurement
    #[arg(long, default_value_t = SPEEDTEST_BYTES)]
    pub speedtest_bytes: u64,

    /// Per-download timeout in seconds
    #[arg(long, default_value_t = SPEEDTEST_TIMEOUT.as_secs())]
    pub speedtest_timeout_secs: u64,

    /// Pause between download rounds in milliseconds
    #[arg(long, default_value_t = SPEEDTEST_PAUSE.as_millis() as u64)]
    pub speedtest_pause_ms: u64,

    /// Benchmark URL templates (repeatable; built-in list when omitted)
    #[arg(long = "speedtest-url")]
    pub speedtest_urls: Vec<String>,

    /// Geolocation endpoint template (`{ip}` is replaced by the address)
    #[arg(long, default_value = DEFAULT_GEO_API_URL)]
    pub geo_api_url: String,

    /// Geolocation retries after the first attempt
    #[arg(long, default_value_t = GEO_RETRIES)]
    pub geo_retries: usize,

    /// Delay between geolocation attempts in milliseconds
    #[arg(long, default_value_t = GEO_RETRY_DELAY.as_millis() as u64)]
    pub geo_retry_delay_ms: u64,

    /// Per-request geolocation timeout in seconds
    #[arg(long, default_value_t = GEO_TIMEOUT.as_secs())]
    pub geo_timeout_secs: u64,

    /// Per-worker pause after each geolocation request in milliseconds
    #[arg(long, default_value_t = REQUEST_PAUSE.as_millis() as u64)]
    pub request_pause_ms: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary: vec![PathBuf::from(DEFAULT_PRIMARY_FILE)],
            override_url: None,
            override_file: None,
            output_txt: PathBuf::from(DEFAULT_OUTPUT_TXT),
            output_csv: PathBuf::from(DEFAULT_OUTPUT_CSV),
            max_latency_ms: MAX_LATENCY_MS,
            max_packet_loss: MAX_PACKET_LOSS_PCT,
            min_speed_mbps: MIN_DOWNLOAD_SPEED_MBPS,
            max_output_nodes: MAX_OUTPUT_NODES,
            shortlist_size: SHORTLIST_SIZE,
            ping_count: PING_COUNT,
            ping_timeout_ms: PING_TIMEOUT.as_millis() as u64,
            ping_pause_ms: PING_PAUSE.as_millis() as u64,
            probe_concurrency: PROBE_CONCURRENCY,
            speedtest_concurrency: SPEEDTEST_CONCURRENCY,
            speedtest_rounds: SPEEDTEST_ROUNDS,
            speedtest_bytes: SPEEDTEST_BYTES,
            speedtest_timeout_secs: SPEEDTEST_TIMEOUT.as_secs(),
            speedtest_pause_ms: SPEEDTEST_PAUSE.as_millis() as u64,
            speedtest_urls: Vec::new(),
            geo_api_url: DEFAULT_GEO_API_URL.to_string(),
            geo_retries: GEO_RETRIES,
            geo_retry_delay_ms: GEO_RETRY_DELAY.as_millis() as u64,
            geo_timeout_secs: GEO_TIMEOUT.as_secs(),
            request_pause_ms: REQUEST_PAUSE.as_millis() as u64,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Qualification thresholds for this run.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            max_latency_ms: self.max_latency_ms,
            max_packet_loss_pct: self.max_packet_loss,
            min_download_mbps: self.min_speed_mbps,
        }
    }

    /// Settings for the reachability prober (also used for the re-check
    /// inside the throughput stage).
    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            attempts: self.ping_count.max(1),
            attempt_timeout: Duration::from_millis(self.ping_timeout_ms),
            attempt_pause: Duration::from_millis(self.ping_pause_ms),
            concurrency: self.probe_concurrency.max(1),
            shortlist_size: self.shortlist_size,
        }
    }

    /// Settings for the throughput qualifier.
    pub fn speedtest_settings(&self) -> SpeedTestSettings {
        let urls = if self.speedtest_urls.is_empty() {
            DEFAULT_SPEEDTEST_URLS.iter().map(|s| s.to_string()).collect()
        } else {
            self.speedtest_urls.clone()
        };
        SpeedTestSettings {
            urls,
            bytes: self.speedtest_bytes.max(1),
            rounds: self.speedtest_rounds.max(1),
            timeout: Duration::from_secs(self.speedtest_timeout_secs),
            pause: Duration::from_millis(self.speedtest_pause_ms),
            concurrency: self.speedtest_concurrency.max(1),
        }
    }

    /// Settings for the geolocation annotator.
    pub fn geo_settings(&self) -> GeoSettings {
        GeoSettings {
            api_url: self.geo_api_url.clone(),
            retries: self.geo_retries,
            retry_delay: Duration::from_millis(self.geo_retry_delay_ms),
            timeout: Duration::from_secs(self.geo_timeout_secs),
            concurrency: self.probe_concurrency.max(1),
            request_pause: Duration::from_millis(self.request_pause_ms),
        }
    }
}

/// Latency, loss, and throughput gates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Maximum average connect latency (inclusive)
    pub max_latency_ms: f64,
    /// Maximum packet loss percentage (inclusive)
    pub max_packet_loss_pct: f64,
    /// Minimum download speed in MB/s (inclusive)
    pub min_download_mbps: f64,
}

impl Thresholds {
    /// The cheap gate: latency and loss only.
    pub fn is_reachable(&self, latency_ms: f64, packet_loss_pct: f64) -> bool {
        latency_ms <= self.max_latency_ms && packet_loss_pct <= self.max_packet_loss_pct
    }

    /// The full gate: latency, loss, and throughput must all hold.
    pub fn is_qualified(&self, latency_ms: f64, packet_loss_pct: f64, download_mbps: f64) -> bool {
        self.is_reachable(latency_ms, packet_loss_pct) && download_mbps >= self.min_download_mbps
    }
}

/// Reachability probe settings.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub attempts: usize,
    pub attempt_timeout: Duration,
    pub attempt_pause: Duration,
    pub concurrency: usize,
    /// Top-K quick-qualified candidates handed to the throughput stage
    pub shortlist_size: usize,
}

/// Throughput measurement settings.
#[derive(Debug, Clone)]
pub struct SpeedTestSettings {
    /// Benchmark URL templates, tried in order
    pub urls: Vec<String>,
    pub bytes: u64,
    pub rounds: usize,
    pub timeout: Duration,
    pub pause: Duration,
    pub concurrency: usize,
}

/// Geolocation settings.
#[derive(Debug, Clone)]
pub struct GeoSettings {
    pub api_url: String,
    pub retries: usize,
    pub retry_delay: Duration,
    pub timeout: Duration,
    pub concurrency: usize,
    pub request_pause: Duration,
}
