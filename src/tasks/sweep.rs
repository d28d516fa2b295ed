//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::AppState;
use crate::cache::Clock;
use crate::catalog::CatalogSource;

/// Spawns a background task that periodically sweeps every store.
///
/// Reads already evict expired entries lazily; the sweep bounds memory for
/// keys that are written and never requested again.
///
/// # Arguments
/// * `state` - Shared application state holding the repositories
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let sweep_handle = spawn_sweep_task(state.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<S, C>(state: AppState<S, C>, interval: Duration) -> JoinHandle<()>
where
    S: CatalogSource,
    C: Clock + Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = state.sweep_all().await;

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
