//! Raw source loading.
//!
//! Loading never fails: a missing file, an unreachable URL, or a non-200
//! response yields an empty blob and a warning.

use std::path::Path;

use log::{info, warn};

use super::parse::{parse_blob, SourceEntry};
use crate::config::{Config, SOURCE_FETCH_TIMEOUT};
use crate::error_handling::{ErrorType, ProcessingStats};

/// Parsed entries from one logical source.
#[derive(Debug, Clone)]
pub struct SourceBlob {
    /// File path or URL, for logging
    pub origin: String,
    pub entries: Vec<SourceEntry>,
}

/// Reads a local file, returning an empty string on any failure.
pub async fn read_text_file(path: &Path) -> String {
    match tokio::fs::read(path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Fetches a remote text list, returning an empty string on any failure.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> String {
    let response = match client.get(url).timeout(SOURCE_FETCH_TIMEOUT).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Could not fetch {}: {}", url, e);
            return String::new();
        }
    };
    if !response.status().is_success() {
        warn!("Fetching {} returned HTTP {}", url, response.status());
        return String::new();
    }
    match response.text().await {
        Ok(text) => text,
        Err(e) => {
            warn!("Could not read body of {}: {}", url, e);
            String::new()
        }
    }
}

async fn load_file_blob(path: &Path, stats: &ProcessingStats) -> SourceBlob {
    let text = read_text_file(path).await;
    let entries = parse_blob(&text);
    if entries.is_empty() {
        warn!("{} yielded no candidates", path.display());
        stats.increment_error(ErrorType::SourceUnavailable);
    } else {
        info!("{} parsed into {} candidates", path.display(), entries.len());
    }
    SourceBlob {
        origin: path.display().to_string(),
        entries,
    }
}

/// Loads the override source: URL first, then the local file when the URL is
/// absent or yields nothing. Returns `None` when neither produced candidates.
async fn load_override(
    config: &Config,
    client: &reqwest::Client,
    stats: &ProcessingStats,
) -> Option<SourceBlob> {
    if let Some(url) = config.override_url.as_deref() {
        info!("Fetching override source {}", url);
        let entries = parse_blob(&fetch_text(client, url).await);
        if !entries.is_empty() {
            info!("Override URL parsed into {} candidates", entries.len());
            return Some(SourceBlob {
                origin: url.to_string(),
                entries,
            });
        }
        warn!("Override URL yielded no candidates, trying the override file");
        stats.increment_error(ErrorType::SourceUnavailable);
    }

    if let Some(path) = config.override_file.as_deref() {
        let blob = load_file_blob(path, stats).await;
        if !blob.entries.is_empty() {
            return Some(blob);
        }
    }

    if config.override_url.is_some() || config.override_file.is_some() {
        info!("Override source not used");
    }
    None
}

/// Loads every configured source in merge priority order: primary files in
/// the order given, then the override source.
pub async fn load_sources(
    config: &Config,
    client: &reqwest::Client,
    stats: &ProcessingStats,
) -> Vec<SourceBlob> {
    let mut blobs = Vec::with_capacity(config.primary.len() + 1);
    for path in &config.primary {
        blobs.push(load_file_blob(path, stats).await);
    }
    if let Some(blob) = load_override(config, client, stats).await {
        blobs.push(blob);
    }
    blobs
}
