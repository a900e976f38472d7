//! Configuration constants.
//!
//! This module defines the defaults used throughout the application, including
//! thresholds, concurrency limits, timeouts, and benchmark endpoints.

use std::time::Duration;

/// Default primary source file (one `address[:port]` per line)
pub const DEFAULT_PRIMARY_FILE: &str = "ip/ip.txt";
/// Default text report path
pub const DEFAULT_OUTPUT_TXT: &str = "ip-no.txt";
/// Default tabular report path
pub const DEFAULT_OUTPUT_CSV: &str = "ip-no.csv";

/// Port assumed for a bare address with no explicit port
pub const DEFAULT_PORT: u16 = 443;

// Qualification thresholds
/// Maximum average TCP connect latency in milliseconds
pub const MAX_LATENCY_MS: f64 = 300.0;
/// Maximum packet loss percentage
pub const MAX_PACKET_LOSS_PCT: f64 = 1.0;
/// Minimum download speed in MB/s
pub const MIN_DOWNLOAD_SPEED_MBPS: f64 = 4.0;

// Selection bounds
/// Maximum number of nodes in the final output
pub const MAX_OUTPUT_NODES: usize = 15;
/// Number of quick-qualified candidates promoted to throughput testing
pub const SHORTLIST_SIZE: usize = 30;

// Sentinels
/// Latency recorded for a candidate with zero successful connects
pub const UNREACHABLE_LATENCY_MS: f64 = 9999.0;
/// Packet loss recorded for a candidate with zero successful connects
pub const TOTAL_PACKET_LOSS_PCT: f64 = 100.0;
/// Country code used when geolocation fails
pub const UNKNOWN_COUNTRY_CODE: &str = "XX";

// Reachability probing
/// TCP connect attempts per candidate
pub const PING_COUNT: usize = 4;
/// Per-attempt TCP connect timeout
pub const PING_TIMEOUT: Duration = Duration::from_millis(2000);
/// Pause between consecutive connect attempts to the same candidate
pub const PING_PAUSE: Duration = Duration::from_millis(50);
/// Worker pool size for probing and geolocation
pub const PROBE_CONCURRENCY: usize = 15;

// Throughput measurement
/// Worker pool size for download measurements
pub const SPEEDTEST_CONCURRENCY: usize = 3;
/// Download measurements per candidate
pub const SPEEDTEST_ROUNDS: usize = 2;
/// Bytes read per download measurement (2MB)
pub const SPEEDTEST_BYTES: u64 = 2 * 1024 * 1024;
/// Per-download timeout
pub const SPEEDTEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Pause between download rounds
pub const SPEEDTEST_PAUSE: Duration = Duration::from_millis(1000);

/// Benchmark URL templates, tried in order until one yields a usable response.
///
/// `{bytes}` expands to the byte budget and `{mb}` to whole MiB (at least 1).
pub const DEFAULT_SPEEDTEST_URLS: &[&str] = &[
    "https://speed.cloudflare.com/__down?bytes={bytes}",
    "https://cf.xiu2.xyz/url",
    "https://cachefly.cachefly.net/{mb}mb.test",
    "http://speedtest.ftp.otenet.gr/files/test{mb}Mb.db",
];

// Geolocation
/// Geolocation endpoint; `{ip}` expands to the address
pub const DEFAULT_GEO_API_URL: &str = "http://ip-api.com/json/{ip}";
/// Retries after the first geolocation attempt
pub const GEO_RETRIES: usize = 2;
/// Delay between geolocation attempts
pub const GEO_RETRY_DELAY: Duration = Duration::from_millis(200);
/// Per-request geolocation timeout
pub const GEO_TIMEOUT: Duration = Duration::from_secs(5);
/// Per-worker pause after each geolocation request
pub const REQUEST_PAUSE: Duration = Duration::from_millis(50);

// Source loading
/// Timeout for fetching a remote source list
pub const SOURCE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Progress logging interval in seconds
pub const LOGGING_INTERVAL_SECS: u64 = 5;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
