//! Line-oriented node list.
//!
//! ```text
//! # Endpoint qualifier: selected nodes
//! # Thresholds: latency <= 300ms, packet loss <= 1%, download speed >= 4MB/s
//! # Selection: qualified
//! # Nodes: 2
//! # Format: address:port#country
//!
//! 5.5.5.5:443#US
//! 7.7.7.7:8443#DE
//! ```

use std::fmt::Write;

use crate::config::Thresholds;
use crate::models::{FinalNode, SelectionMode};

const FALLBACK_NOTE: &str = "fallback: latency only, download speed not measured";

/// `address:port#CC`
pub fn node_line(node: &FinalNode) -> String {
    format!("{}#{}", node.candidate, node.country_code)
}

pub fn render_txt(nodes: &[FinalNode], mode: SelectionMode, thresholds: &Thresholds) -> String {
    let mut out = String::new();
    let selection = match mode {
        SelectionMode::Qualified => mode.as_str(),
        SelectionMode::Fallback => FALLBACK_NOTE,
    };

    // Writing into a String cannot fail
    let _ = writeln!(out, "# Endpoint qualifier: selected nodes");
    let _ = writeln!(
        out,
        "# Thresholds: latency <= {}ms, packet loss <= {}%, download speed >= {}MB/s",
        thresholds.max_latency_ms, thresholds.max_packet_loss_pct, thresholds.min_download_mbps
    );
    let _ = writeln!(out, "# Selection: {}", selection);
    let _ = writeln!(out, "# Nodes: {}", nodes.len());
    let _ = writeln!(out, "# Format: address:port#country");
    out.push('\n');

    for node in nodes {
        out.push_str(&node_line(node));
        out.push('\n');
    }
    out
}
