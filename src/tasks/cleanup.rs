//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::config::MAX_CLEANUP_INTERVAL;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// Each tick locks the store for one full sweep. The task waits on either
/// the next tick or the shutdown token, so cancelling takes effect between
/// sweeps and never interrupts one in progress.
///
/// # Arguments
/// * `store` - Shared reference to the cache store
/// * `cleanup_interval` - Interval between cleanup runs, clamped to
///   between 1ms and [`MAX_CLEANUP_INTERVAL`]
/// * `shutdown` - Token that stops the task once cancelled
/// * `runtime` - Runtime the task is spawned on
///
/// # Returns
/// A JoinHandle for the spawned task, which completes after `shutdown` is
/// cancelled.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::<String, String>::new(1000)?));
/// let shutdown = CancellationToken::new();
/// let handle = spawn_cleanup_task(store, Duration::from_secs(1), shutdown.clone(), &Handle::current());
/// // Later:
/// shutdown.cancel();
/// handle.await?;
/// ```
pub fn spawn_cleanup_task<K, V>(
    store: Arc<Mutex<CacheStore<K, V>>>,
    cleanup_interval: Duration,
    shutdown: CancellationToken,
    runtime: &Handle,
) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    let cleanup_interval = cleanup_interval.clamp(Duration::from_millis(1), MAX_CLEANUP_INTERVAL);

    runtime.spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {:?}",
            cleanup_interval
        );

        // First sweep runs one full interval after start
        let start = time::Instant::now() + cleanup_interval;
        let mut ticker = time::interval_at(start, cleanup_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = store.lock().cleanup_expired();

                    if removed > 0 {
                        info!("TTL cleanup: removed {} expired entries", removed);
                    } else {
                        debug!("TTL cleanup: no expired entries found");
                    }
                }
                _ = shutdown.cancelled() => {
                    break;
                }
            }
        }

        info!("TTL cleanup task stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_store(capacity: usize) -> Arc<Mutex<CacheStore<String, String>>> {
        Arc::new(Mutex::new(CacheStore::new(capacity).unwrap()))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let store = shared_store(100);

        store.lock().set(
            "expire_soon".to_string(),
            "value".to_string(),
            Some(Duration::from_millis(10)),
        );

        let shutdown = CancellationToken::new();
        let handle = spawn_cleanup_task(
            store.clone(),
            Duration::from_millis(20),
            shutdown.clone(),
            &Handle::current(),
        );

        // Wait for entry to expire and cleanup to run
        tokio::time::sleep(Duration::from_millis(150)).await;

        // Removed by the sweep, not by a lookup
        {
            let guard = store.lock();
            assert_eq!(guard.len(), 0, "Expired entry should have been cleaned up");
            assert_eq!(guard.stats().expirations, 1);
        }

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let store = shared_store(100);

        {
            let mut guard = store.lock();
            guard.set(
                "long_lived".to_string(),
                "value".to_string(),
                Some(Duration::from_secs(3600)),
            );
            guard.set("forever".to_string(), "value".to_string(), None);
        }

        let shutdown = CancellationToken::new();
        let handle = spawn_cleanup_task(
            store.clone(),
            Duration::from_millis(10),
            shutdown.clone(),
            &Handle::current(),
        );

        // Let several sweeps run
        tokio::time::sleep(Duration::from_millis(100)).await;

        {
            let mut guard = store.lock();
            assert_eq!(guard.get("long_lived").as_deref(), Some("value"));
            assert_eq!(guard.get("forever").as_deref(), Some("value"));
        }

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_task_stops_on_cancel() {
        let store = shared_store(100);
        let shutdown = CancellationToken::new();

        let handle = spawn_cleanup_task(
            store,
            Duration::from_secs(60),
            shutdown.clone(),
            &Handle::current(),
        );

        // Cancel while the task is waiting for its first tick
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("Task should finish after cancellation")
            .unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_task_clamps_out_of_range_interval() {
        let store = shared_store(100);

        for interval in [Duration::MAX, Duration::ZERO] {
            let shutdown = CancellationToken::new();
            let handle = spawn_cleanup_task(
                store.clone(),
                interval,
                shutdown.clone(),
                &Handle::current(),
            );

            tokio::time::sleep(Duration::from_millis(20)).await;
            shutdown.cancel();

            // A panic inside the task would surface here as a JoinError
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_cleanup_task_no_sweep_after_cancel() {
        let store = shared_store(100);
        let shutdown = CancellationToken::new();

        let handle = spawn_cleanup_task(
            store.clone(),
            Duration::from_millis(10),
            shutdown.clone(),
            &Handle::current(),
        );

        shutdown.cancel();
        handle.await.unwrap();

        store.lock().set(
            "k".to_string(),
            "v".to_string(),
            Some(Duration::from_millis(5)),
        );
        tokio::time::sleep(Duration::from_millis(60)).await;

        // Still physically present: nothing swept it
        assert_eq!(store.lock().len(), 1);
    }
}
