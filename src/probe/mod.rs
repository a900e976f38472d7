//! Reachability Prober.
//!
//! Cheap first-pass filter: a few TCP handshakes per candidate, aggregated
//! into an average latency and a loss percentage. Candidates passing the
//! latency/loss gate are ranked by latency and the top of that ranking is
//! handed to the throughput stage.

mod connector;

use std::cmp::Ordering;
use std::sync::Arc;

use log::{debug, info};

pub use connector::{Connector, TcpConnector};

use crate::config::{ProbeSettings, Thresholds, TOTAL_PACKET_LOSS_PCT, UNREACHABLE_LATENCY_MS};
use crate::error_handling::{ErrorType, ProcessingStats};
use crate::models::{Candidate, ProbeResult};
use crate::utils::run_bounded;

/// Runs connect attempts against candidates.
///
/// Cloning is cheap; clones share the connector and the stats counters.
#[derive(Clone)]
pub struct Prober {
    connector: Arc<dyn Connector>,
    settings: ProbeSettings,
    stats: Arc<ProcessingStats>,
}

impl Prober {
    pub fn new(
        connector: Arc<dyn Connector>,
        settings: ProbeSettings,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            connector,
            settings,
            stats,
        }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Probes one candidate with the configured number of attempts.
    pub async fn ping(&self, candidate: Candidate) -> ProbeResult {
        let addr = candidate.socket_addr();
        let attempts = self.settings.attempts.max(1);
        let mut successes = 0usize;
        let mut total_ms = 0.0f64;

        for attempt in 0..attempts {
            if attempt > 0 && !self.settings.attempt_pause.is_zero() {
                tokio::time::sleep(self.settings.attempt_pause).await;
            }
            match self
                .connector
                .connect(addr, self.settings.attempt_timeout)
                .await
            {
                Ok(elapsed) => {
                    successes += 1;
                    total_ms += elapsed.as_secs_f64() * 1000.0;
                }
                Err(e) => {
                    debug!("{}", e);
                    self.stats.increment_error(e.error_type());
                }
            }
        }

        let (latency_ms, packet_loss_pct) = summarize(attempts, successes, total_ms);
        debug!(
            "{} latency {:.1}ms, loss {:.1}%",
            candidate, latency_ms, packet_loss_pct
        );
        ProbeResult {
            candidate,
            latency_ms,
            packet_loss_pct,
        }
    }

    /// Probes every candidate on the bounded pool and returns one result per
    /// candidate, ordered by candidate ordinal.
    pub async fn probe_all(&self, candidates: Vec<Candidate>) -> Vec<ProbeResult> {
        let prober = self.clone();
        let outcomes = run_bounded(
            "reachability",
            candidates,
            self.settings.concurrency,
            move |candidate| {
                let prober = prober.clone();
                async move { prober.ping(candidate).await }
            },
        )
        .await;

        let mut results: Vec<ProbeResult> = outcomes
            .into_iter()
            .map(|(candidate, result)| {
                result.unwrap_or_else(|| {
                    self.stats.increment_error(ErrorType::WorkerPanicked);
                    ProbeResult::unreachable(candidate)
                })
            })
            .collect();
        results.sort_by_key(|r| r.candidate.ordinal);
        results
    }
}

/// Average latency over successful attempts and loss over all attempts.
///
/// Zero successes yields the unreachable sentinels.
pub fn summarize(attempts: usize, successes: usize, total_success_ms: f64) -> (f64, f64) {
    if successes == 0 || attempts == 0 {
        return (UNREACHABLE_LATENCY_MS, TOTAL_PACKET_LOSS_PCT);
    }
    let latency = total_success_ms / successes as f64;
    let loss = 100.0 * (attempts - successes) as f64 / attempts as f64;
    (latency, loss)
}

/// Ascending latency, ties by candidate insertion order.
pub fn by_latency(a: &ProbeResult, b: &ProbeResult) -> Ordering {
    a.latency_ms
        .total_cmp(&b.latency_ms)
        .then_with(|| a.candidate.ordinal.cmp(&b.candidate.ordinal))
}

/// Filters results through the latency/loss gate, sorted by ascending latency.
pub fn quick_qualify(results: &[ProbeResult], thresholds: &Thresholds) -> Vec<ProbeResult> {
    let mut passed: Vec<ProbeResult> = results
        .iter()
        .filter(|r| thresholds.is_reachable(r.latency_ms, r.packet_loss_pct))
        .copied()
        .collect();
    passed.sort_by(by_latency);
    passed
}

/// The first `limit` quick-qualified candidates (input must already be sorted).
pub fn shortlist(quick_qualified: &[ProbeResult], limit: usize) -> Vec<Candidate> {
    quick_qualified
        .iter()
        .take(limit)
        .map(|r| r.candidate)
        .collect()
}

/// Output of the reachability stage.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// One result per merged candidate
    pub results: Vec<ProbeResult>,
    /// Results passing the cheap gate, ascending latency
    pub quick_qualified: Vec<ProbeResult>,
    /// Candidates promoted to throughput testing
    pub shortlist: Vec<Candidate>,
}

/// Runs the whole reachability stage.
pub async fn run_reachability_stage(
    prober: &Prober,
    candidates: Vec<Candidate>,
    thresholds: &Thresholds,
) -> ProbeOutcome {
    let total = candidates.len();
    let results = prober.probe_all(candidates).await;
    let quick_qualified = quick_qualify(&results, thresholds);
    let shortlist = shortlist(&quick_qualified, prober.settings().shortlist_size);
    info!(
        "Quick screen: {}/{} candidates reachable, top {} promoted to throughput testing",
        quick_qualified.len(),
        total,
        shortlist.len()
    );
    ProbeOutcome {
        results,
        quick_qualified,
        shortlist,
    }
}
