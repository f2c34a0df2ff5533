//! Expiration Sweep Task
//!
//! Expired entries are already invisible to readers; this task reclaims
//! their memory so idle keys do not accumulate.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a task that calls [`MemoryCache::cleanup_expired`] every
/// `cleanup_interval_secs` seconds until `shutdown` is cancelled.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryCache::new(1000, 1024 * 1024));
/// let shutdown = CancellationToken::new();
/// let handle = spawn_cleanup_task(store.clone(), 1, shutdown.clone());
/// // Later, during shutdown:
/// shutdown.cancel();
/// handle.await?;
/// ```
pub fn spawn_cleanup_task(
    store: Arc<MemoryCache>,
    cleanup_interval_secs: u64,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiration sweep with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Expiration sweep stopped");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }

            let removed = store.cleanup_expired();
            if removed > 0 {
                info!("Expiration sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiration sweep: no expired entries found");
            }
        }
    })
}
