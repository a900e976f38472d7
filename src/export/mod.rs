//! Report Emitter.
//!
//! Writes the selected nodes as a plain `address:port#CC` list and as a CSV
//! with the measurements. Both documents are rendered and written to temp
//! files next to their targets before either is renamed into place, so a
//! failed run never leaves a truncated or mismatched pair behind.

mod csv;
mod txt;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use tempfile::NamedTempFile;

pub use self::csv::{render_csv, CSV_HEADER};
pub use self::txt::{node_line, render_txt};

use crate::config::Thresholds;
use crate::models::{FinalNode, SelectionMode};

/// Writes `contents` to a synced temp file in the directory of `path`.
fn stage(path: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync {}", path.display()))?;
    Ok(tmp)
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path)
        .with_context(|| format!("Failed to move report into place at {}", path.display()))?;
    Ok(())
}

/// Replaces `path` with `contents` via a sibling temp file.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    persist(stage(path, contents)?, path)
}

/// Renders and writes both reports.
///
/// Nothing is moved into place unless both documents render and both temp
/// files are written.
pub fn write_reports(
    txt_path: &Path,
    csv_path: &Path,
    nodes: &[FinalNode],
    mode: SelectionMode,
    thresholds: &Thresholds,
) -> Result<()> {
    let txt = render_txt(nodes, mode, thresholds);
    let csv = render_csv(nodes)?;

    let staged_txt = stage(txt_path, txt.as_bytes())?;
    let staged_csv = stage(csv_path, &csv)?;
    persist(staged_txt, txt_path)?;
    persist(staged_csv, csv_path)?;
    info!(
        "Wrote {} nodes to {} and {}",
        nodes.len(),
        txt_path.display(),
        csv_path.display()
    );
    Ok(())
}

/// Logs the final ranking, one node per line.
pub fn log_leaderboard(nodes: &[FinalNode]) {
    info!("Final ranking ({} nodes):", nodes.len());
    for (rank, node) in nodes.iter().enumerate() {
        let speed = if node.download_speed_mbps > 0.0 {
            format!("{:.2}MB/s", node.download_speed_mbps)
        } else {
            "unknown".to_string()
        };
        info!(
            "{:>2}. {} latency: {:.1}ms, loss: {:.1}%, speed: {}",
            rank + 1,
            node_line(node),
            node.latency_ms,
            node.packet_loss_pct,
            speed
        );
    }
}
