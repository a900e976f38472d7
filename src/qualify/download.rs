//! Benchmark download seam.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use url::Url;

use crate::error_handling::DownloadError;
use crate::initialization::init_pinned_client;
use crate::models::Candidate;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Bytes read from one benchmark endpoint and the time it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadSample {
    pub bytes: u64,
    pub elapsed: Duration,
}

impl DownloadSample {
    /// Throughput in MB/s (MiB per second).
    pub fn mbps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.bytes as f64 / secs / BYTES_PER_MIB
    }
}

/// One bounded download through a candidate.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(
        &self,
        candidate: Candidate,
        url: &str,
        max_bytes: u64,
        timeout: Duration,
    ) -> Result<DownloadSample, DownloadError>;
}

/// Fills `{bytes}` and `{mb}` placeholders in a benchmark URL template.
pub fn expand_template(template: &str, bytes: u64) -> String {
    let mb = (bytes / (1024 * 1024)).max(1);
    template
        .replace("{bytes}", &bytes.to_string())
        .replace("{mb}", &mb.to_string())
}

/// reqwest downloader that sends the benchmark request to the candidate.
///
/// The URL host is resolved to the candidate address and its port replaced by
/// the candidate port, so TLS still negotiates the benchmark host's name.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    user_agent: String,
}

impl HttpDownloader {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

/// Parses `url` and points it at `port`, returning the host to pin.
fn pinned_target(url: &str, port: u16) -> Result<(Url, String), DownloadError> {
    let invalid = |reason: &str| DownloadError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let mut target = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    let host = target
        .host_str()
        .ok_or_else(|| invalid("missing host"))?
        .to_string();
    target
        .set_port(Some(port))
        .map_err(|_| invalid("URL cannot carry a port"))?;
    Ok((target, host))
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(
        &self,
        candidate: Candidate,
        url: &str,
        max_bytes: u64,
        timeout: Duration,
    ) -> Result<DownloadSample, DownloadError> {
        let (target, host) = pinned_target(url, candidate.port)?;
        let client = init_pinned_client(
            &self.user_agent,
            &host,
            SocketAddr::V4(candidate.socket_addr()),
            timeout,
        )?;

        let start = Instant::now();
        let mut response = client.get(target).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status.as_u16()));
        }

        let mut received = 0u64;
        while received < max_bytes {
            match response.chunk().await? {
                Some(chunk) => received += chunk.len() as u64,
                None => break,
            }
        }
        let elapsed = start.elapsed();

        if received == 0 {
            return Err(DownloadError::EmptyBody);
        }
        Ok(DownloadSample {
            bytes: received,
            elapsed,
        })
    }
}
