//! Bounded worker pool shared by every concurrent stage.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::warn;
use tokio_util::sync::CancellationToken;

use crate::app::{shutdown_gracefully, spawn_progress_logger};
use crate::initialization::init_semaphore;

/// Runs `work` once per item with at most `limit` items in flight.
///
/// Returns once every worker has finished (the stage barrier). Each item is
/// paired with its result, or `None` if its worker panicked. Output order is
/// completion order; callers re-sort explicitly.
pub async fn run_bounded<T, R, F, Fut>(
    stage: &'static str,
    items: Vec<T>,
    limit: usize,
    work: F,
) -> Vec<(T, Option<R>)>
where
    T: Clone + Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let total = items.len();
    let semaphore = init_semaphore(limit.max(1));
    let work = Arc::new(work);
    let completed = Arc::new(AtomicUsize::new(0));
    let start_time = std::time::Instant::now();

    let cancel = CancellationToken::new();
    let logging_task = spawn_progress_logger(
        stage,
        start_time,
        Arc::clone(&completed),
        total,
        cancel.child_token(),
    );

    let mut tasks = FuturesUnordered::new();
    for item in items {
        let key = item.clone();
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("{stage}: semaphore closed, skipping work item");
                tasks.push(futures::future::Either::Left(async move { (key, None) }));
                continue;
            }
        };

        let work = Arc::clone(&work);
        let completed = Arc::clone(&completed);
        let handle = tokio::spawn(async move {
            let _permit = permit;
            let result = work(item).await;
            completed.fetch_add(1, Ordering::SeqCst);
            result
        });
        tasks.push(futures::future::Either::Right(async move {
            match handle.await {
                Ok(result) => (key, Some(result)),
                Err(join_error) => {
                    warn!("{stage}: worker panicked: {join_error:?}");
                    (key, None)
                }
            }
        }));
    }

    let mut results = Vec::with_capacity(total);
    while let Some(outcome) = tasks.next().await {
        results.push(outcome);
    }

    shutdown_gracefully(cancel, Some(logging_task)).await;
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_every_item_reported_once() {
        let results =
            run_bounded("test", (0..20).collect(), 4, |n: u32| async move { n * 2 }).await;
        assert_eq!(results.len(), 20);
        let mut seen: Vec<u32> = results
            .into_iter()
            .map(|(n, r)| {
                assert_eq!(r, Some(n * 2));
                n
            })
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_concurrency_limit_respected() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (in_flight_c, peak_c) = (Arc::clone(&in_flight), Arc::clone(&peak));

        run_bounded("test", (0..12).collect::<Vec<u32>>(), 3, move |_| {
            let in_flight = Arc::clone(&in_flight_c);
            let peak = Arc::clone(&peak_c);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_worker_reported_as_none() {
        let results = run_bounded("test", vec![1u32, 2, 3], 2, |n| async move {
            if n == 2 {
                panic!("boom");
            }
            n
        })
        .await;
        assert_eq!(results.len(), 3);
        for (n, r) in results {
            if n == 2 {
                assert!(r.is_none());
            } else {
                assert_eq!(r, Some(n));
            }
        }
    }

    #[tokio::test]
    async fn test_empty_stage() {
        let results = run_bounded("test", Vec::<u32>::new(), 3, |n| async move { n }).await;
        assert!(results.is_empty());
    }
}
