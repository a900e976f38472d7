//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

/// Stops a stage's background logging task and waits for it to exit.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    logging_task: Option<tokio::task::JoinHandle<()>>,
) {
    cancel.cancel();
    if let Some(logging_task) = logging_task {
        let _ = logging_task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_stops_progress_logger() {
        let cancel = CancellationToken::new();
        let task = crate::app::logging::spawn_progress_logger(
            "test",
            std::time::Instant::now(),
            Arc::new(AtomicUsize::new(0)),
            1,
            cancel.child_token(),
        );
        let result = tokio::time::timeout(
            Duration::from_secs(1),
            shutdown_gracefully(cancel, Some(task)),
        )
        .await;
        assert!(result.is_ok(), "logger task should exit promptly");
    }

    #[tokio::test]
    async fn test_shutdown_without_task() {
        shutdown_gracefully(CancellationToken::new(), None).await;
    }
}
