//! TTL Sweeper Task
//!
//! Background task that periodically removes expired cache entries.
//! Lazy removal on read already keeps hot keys honest; the sweeper exists
//! so entries nobody asks for again do not pin memory until restart.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheBackend;

/// Spawns a background task that periodically purges expired cache entries.
///
/// # Arguments
/// * `backend` - shared cache backend
/// * `cleanup_interval_secs` - interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(
    backend: Arc<dyn CacheBackend>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL sweeper with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            match backend.purge_expired().await {
                Ok(removed) if removed > 0 => {
                    info!("TTL sweep: removed {} expired entries", removed);
                }
                Ok(_) => {
                    debug!("TTL sweep: no expired entries found");
                }
                Err(err) => {
                    // Backend hiccups here cost memory, not correctness.
                    warn!(%err, "TTL sweep failed");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryBackend;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let backend = MemoryBackend::shared();

        backend
            .set("expire_soon", "v".to_string(), Duration::from_millis(100))
            .await
            .unwrap();

        let handle = spawn_cleanup_task(backend.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(backend.get("expire_soon").await.unwrap(), None);
        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let backend = MemoryBackend::shared();

        backend
            .set("long_lived", "v".to_string(), Duration::from_secs(3600))
            .await
            .unwrap();

        let handle = spawn_cleanup_task(backend.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(
            backend.get("long_lived").await.unwrap().as_deref(),
            Some("v")
        );
        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let backend = MemoryBackend::shared();

        let handle = spawn_cleanup_task(backend, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
