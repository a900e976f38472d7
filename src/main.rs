//! Command-line entry point.
//!
//! Thin wrapper around the `endpoint_qualifier` library: argument parsing,
//! logger setup, and the one-line summary.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use endpoint_qualifier::initialization::init_logger_with;
use endpoint_qualifier::{run_pipeline, Config, SelectionMode};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format)
        .context("Failed to initialize logger")?;

    match run_pipeline(config).await {
        Ok(report) => {
            let mode = match report.selection_mode {
                SelectionMode::Qualified => "qualified",
                SelectionMode::Fallback => "fallback, latency only",
            };
            println!(
                "Selected {} node{} ({}) from {} candidates ({} reachable, {} speed-tested) in {:.1}s",
                report.nodes.len(),
                if report.nodes.len() == 1 { "" } else { "s" },
                mode,
                report.merged,
                report.quick_qualified,
                report.shortlisted,
                report.elapsed_seconds
            );
            println!(
                "Results saved in {} and {}",
                report.txt_path.display(),
                report.csv_path.display()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("endpoint_qualifier error: {:#}", e);
            process::exit(1);
        }
    }
}
