//! Ranking & Selection Engine.

use std::cmp::Ordering;

use log::{info, warn};

use crate::models::{ProbeResult, QualificationResult, SelectedNode, Selection, SelectionMode};
use crate::probe::by_latency;

/// Descending speed, ties by candidate insertion order.
fn by_speed(a: &QualificationResult, b: &QualificationResult) -> Ordering {
    b.download_speed_mbps
        .total_cmp(&a.download_speed_mbps)
        .then_with(|| a.candidate.ordinal.cmp(&b.candidate.ordinal))
}

/// Picks the final nodes.
///
/// Qualified results ranked by speed are used when there are any. Otherwise
/// the quick-qualified set (ascending latency) is used with speed reported as
/// zero, and the selection is marked [`SelectionMode::Fallback`]. Output never
/// exceeds `max_nodes`.
pub fn select(
    results: &[QualificationResult],
    quick_qualified: &[ProbeResult],
    max_nodes: usize,
) -> Selection {
    let mut qualified: Vec<QualificationResult> =
        results.iter().filter(|r| r.qualified).copied().collect();

    if !qualified.is_empty() {
        qualified.sort_by(by_speed);
        qualified.truncate(max_nodes);
        info!("Selected {} qualified nodes", qualified.len());
        return Selection {
            mode: SelectionMode::Qualified,
            nodes: qualified
                .into_iter()
                .map(|r| SelectedNode {
                    candidate: r.candidate,
                    latency_ms: r.latency_ms,
                    packet_loss_pct: r.packet_loss_pct,
                    download_speed_mbps: r.download_speed_mbps,
                })
                .collect(),
        };
    }

    let mut reachable = quick_qualified.to_vec();
    reachable.sort_by(by_latency);
    reachable.truncate(max_nodes);
    warn!(
        "No node passed the throughput test; falling back to {} lowest-latency nodes",
        reachable.len()
    );
    Selection {
        mode: SelectionMode::Fallback,
        nodes: reachable
            .into_iter()
            .map(|r| SelectedNode {
                candidate: r.candidate,
                latency_ms: r.latency_ms,
                packet_loss_pct: r.packet_loss_pct,
                download_speed_mbps: 0.0,
            })
            .collect(),
    }
}
