//! Tabular node list with the measurements behind the ranking.

use anyhow::{Context, Result};
use csv::Writer;

use crate::models::FinalNode;

pub const CSV_HEADER: [&str; 6] = [
    "ip",
    "port",
    "country",
    "latency_ms",
    "packet_loss_percent",
    "download_speed_mbps",
];

/// Two decimal places.
fn round2(value: f64) -> String {
    format!("{:.2}", value)
}

/// Renders the CSV document, one row per node in selection order.
pub fn render_csv(nodes: &[FinalNode]) -> Result<Vec<u8>> {
    let mut writer = Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;

    for node in nodes {
        writer
            .write_record([
                node.candidate.address.to_string(),
                node.candidate.port.to_string(),
                node.country_code.to_string(),
                round2(node.latency_ms),
                round2(node.packet_loss_pct),
                round2(node.download_speed_mbps),
            ])
            .with_context(|| format!("Failed to write CSV row for {}", node.candidate))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))
}
