// Shared test helpers: deterministic collaborators and config setup.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use endpoint_qualifier::error_handling::{DownloadError, GeoError, ProbeError};
use endpoint_qualifier::{Candidate, Config, Connector, CountryLookup, DownloadSample, Downloader};

const MIB: u64 = 1024 * 1024;

/// Connects to listed addresses with a fixed latency; everything else times out.
#[derive(Default)]
pub struct FakeConnector {
    latencies: HashMap<Ipv4Addr, u64>,
}

#[allow(dead_code)]
impl FakeConnector {
    pub fn new(latencies: &[(&str, u64)]) -> Self {
        Self {
            latencies: latencies
                .iter()
                .map(|(ip, ms)| (ip.parse().expect("valid IPv4"), *ms))
                .collect(),
        }
    }

    pub fn with(mut self, ip: Ipv4Addr, ms: u64) -> Self {
        self.latencies.insert(ip, ms);
        self
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self, addr: SocketAddrV4, timeout: Duration) -> Result<Duration, ProbeError> {
        match self.latencies.get(addr.ip()) {
            Some(ms) => Ok(Duration::from_millis(*ms)),
            None => Err(ProbeError::Timeout { addr, timeout }),
        }
    }
}

/// Downloads through listed addresses at a fixed MiB/s; others get a 503.
#[derive(Default)]
pub struct FakeDownloader {
    speeds: HashMap<Ipv4Addr, u64>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeDownloader {
    pub fn new(speeds: &[(&str, u64)]) -> Self {
        Self {
            speeds: speeds
                .iter()
                .map(|(ip, s)| (ip.parse().expect("valid IPv4"), *s))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, ip: Ipv4Addr, speed: u64) -> Self {
        self.speeds.insert(ip, speed);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    async fn download(
        &self,
        candidate: Candidate,
        _url: &str,
        _max_bytes: u64,
        _timeout: Duration,
    ) -> Result<DownloadSample, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.speeds.get(&candidate.address) {
            Some(speed) => Ok(DownloadSample {
                bytes: speed * MIB,
                elapsed: Duration::from_secs(1),
            }),
            None => Err(DownloadError::Status(503)),
        }
    }
}

/// Returns the same country code for every address.
pub struct FixedLookup(pub &'static str);

#[async_trait]
impl CountryLookup for FixedLookup {
    async fn lookup(&self, _ip: Ipv4Addr) -> Result<String, GeoError> {
        Ok(self.0.to_string())
    }
}

/// Writes `lines` to `dir/name` and returns the path.
pub fn write_source(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create source file");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write source line");
    }
    path
}

/// Config with every pause zeroed and outputs inside `dir`.
pub fn test_config(dir: &Path, primary: Vec<PathBuf>) -> Config {
    Config {
        primary,
        output_txt: dir.join("ip-no.txt"),
        output_csv: dir.join("ip-no.csv"),
        ping_pause_ms: 0,
        ping_timeout_ms: 100,
        speedtest_pause_ms: 0,
        speedtest_urls: vec!["https://bench.test/__down?bytes={bytes}".to_string()],
        geo_retry_delay_ms: 1,
        request_pause_ms: 0,
        ..Default::default()
    }
}

/// Report lines that are neither header comments nor blank.
#[allow(dead_code)]
pub fn data_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}
