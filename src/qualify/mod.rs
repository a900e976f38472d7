//! Throughput Qualifier.
//!
//! Runs on the shortlist only. Each candidate is re-pinged, and those still
//! passing the latency/loss gate get a few bounded downloads through it. A
//! failing benchmark endpoint falls through to the next endpoint in the list.

mod download;

use std::sync::Arc;

use log::{debug, info};

pub use download::{expand_template, DownloadSample, Downloader, HttpDownloader};

use crate::config::{SpeedTestSettings, Thresholds};
use crate::error_handling::{ErrorType, ProcessingStats};
use crate::models::{Candidate, QualificationResult};
use crate::probe::Prober;
use crate::utils::run_bounded;

#[derive(Clone)]
pub struct Qualifier {
    prober: Prober,
    downloader: Arc<dyn Downloader>,
    settings: SpeedTestSettings,
    thresholds: Thresholds,
    stats: Arc<ProcessingStats>,
}

impl Qualifier {
    pub fn new(
        prober: Prober,
        downloader: Arc<dyn Downloader>,
        settings: SpeedTestSettings,
        thresholds: Thresholds,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            prober,
            downloader,
            settings,
            thresholds,
            stats,
        }
    }

    /// One measurement: endpoints are tried in order until one succeeds.
    ///
    /// Returns `None` when every endpoint failed.
    pub async fn measure_once(&self, candidate: Candidate) -> Option<f64> {
        for template in &self.settings.urls {
            let url = expand_template(template, self.settings.bytes);
            match self
                .downloader
                .download(candidate, &url, self.settings.bytes, self.settings.timeout)
                .await
            {
                Ok(sample) => {
                    let mbps = sample.mbps();
                    debug!(
                        "{} via {}: {} bytes in {:?} ({:.2} MB/s)",
                        candidate, url, sample.bytes, sample.elapsed, mbps
                    );
                    return Some(mbps);
                }
                Err(e) => {
                    debug!("{} via {}: {}", candidate, url, e);
                    self.stats.increment_error(e.error_type());
                }
            }
        }
        None
    }

    /// Average of the successful rounds, zero if none succeeded.
    pub async fn measure_speed(&self, candidate: Candidate) -> f64 {
        let mut speeds = Vec::with_capacity(self.settings.rounds);
        for round in 0..self.settings.rounds {
            if round > 0 && !self.settings.pause.is_zero() {
                tokio::time::sleep(self.settings.pause).await;
            }
            if let Some(mbps) = self.measure_once(candidate).await {
                speeds.push(mbps);
            }
        }
        if speeds.is_empty() {
            0.0
        } else {
            speeds.iter().sum::<f64>() / speeds.len() as f64
        }
    }

    /// Re-checks reachability, then measures throughput if the gate holds.
    pub async fn qualify(&self, candidate: Candidate) -> QualificationResult {
        let recheck = self.prober.ping(candidate).await;
        if !self
            .thresholds
            .is_reachable(recheck.latency_ms, recheck.packet_loss_pct)
        {
            debug!(
                "{} failed re-check ({:.1}ms, {:.1}% loss), skipping download",
                candidate, recheck.latency_ms, recheck.packet_loss_pct
            );
            return QualificationResult {
                candidate,
                latency_ms: recheck.latency_ms,
                packet_loss_pct: recheck.packet_loss_pct,
                download_speed_mbps: 0.0,
                qualified: false,
            };
        }

        let download_speed_mbps = self.measure_speed(candidate).await;
        let qualified = self.thresholds.is_qualified(
            recheck.latency_ms,
            recheck.packet_loss_pct,
            download_speed_mbps,
        );
        debug!(
            "{} {:.2} MB/s, {}",
            candidate,
            download_speed_mbps,
            if qualified { "qualified" } else { "rejected" }
        );
        QualificationResult {
            candidate,
            latency_ms: recheck.latency_ms,
            packet_loss_pct: recheck.packet_loss_pct,
            download_speed_mbps,
            qualified,
        }
    }

    /// Qualifies the whole shortlist on the (small) throughput pool.
    ///
    /// Results are ordered by candidate ordinal.
    pub async fn qualify_all(&self, shortlist: Vec<Candidate>) -> Vec<QualificationResult> {
        let total = shortlist.len();
        let qualifier = self.clone();
        let outcomes = run_bounded(
            "throughput",
            shortlist,
            self.settings.concurrency,
            move |candidate| {
                let qualifier = qualifier.clone();
                async move { qualifier.qualify(candidate).await }
            },
        )
        .await;

        let mut results: Vec<QualificationResult> = outcomes
            .into_iter()
            .map(|(candidate, result)| {
                result.unwrap_or_else(|| {
                    self.stats.increment_error(ErrorType::WorkerPanicked);
                    QualificationResult::failed(candidate)
                })
            })
            .collect();
        results.sort_by_key(|r| r.candidate.ordinal);

        info!(
            "Throughput test: {}/{} candidates qualified",
            results.iter().filter(|r| r.qualified).count(),
            total
        );
        results
    }
}
