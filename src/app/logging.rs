//! Progress logging utilities.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::LOGGING_INTERVAL_SECS;

/// Logs progress information about one pipeline stage.
///
/// # Arguments
///
/// * `stage` - Stage name shown in the log line
/// * `start_time` - When the stage started
/// * `completed` - Atomic counter of finished work items
/// * `total` - Number of work items in the stage
pub fn log_progress(
    stage: &str,
    start_time: std::time::Instant,
    completed: &Arc<AtomicUsize>,
    total: usize,
) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let done = completed.load(Ordering::SeqCst);
    let rate = if elapsed_secs > 0.0 {
        done as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "{}: {}/{} done in {:.2} seconds (~{:.2}/sec)",
        stage, done, total, elapsed_secs, rate
    );
}

/// Spawns a task that logs stage progress on a fixed interval until `cancel`
/// fires.
pub fn spawn_progress_logger(
    stage: &'static str,
    start_time: std::time::Instant,
    completed: Arc<AtomicUsize>,
    total: usize,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL_SECS));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(stage, start_time, &completed, total);
                }
                _ = cancel.cancelled() => {
                    break;
                }
            }
        }
    })
}
