//! Sweep Task
//!
//! Background task that periodically runs the bounded cache sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

// == Sweep Handle ==
/// Handle to a running sweep task.
///
/// Dropping the handle also stops the task on its next tick; `stop` waits for
/// the task to finish so no further cache mutation happens afterwards.
#[derive(Debug)]
pub struct SweepHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Signals the task to stop and waits until it has.
    ///
    /// Cancellation is cooperative: a batch already in progress completes
    /// before the task exits.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }

    /// True once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns the background sweep task.
///
/// On every tick the task takes the exclusive lock, runs one bounded sweep and
/// releases the lock; the per-invocation batch size and time budget come from
/// the store's configuration.
pub fn spawn_sweep_task(cache: Arc<RwLock<CacheStore>>, interval: Duration) -> SweepHandle {
    let (shutdown, mut signal) = watch::channel(false);

    let handle = tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "sweep task started");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first interval tick fires immediately; skip it so the task
        // sweeps one full interval after startup.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let cleaned = {
                        let mut store = cache.write().await;
                        store.sweep()
                    };
                    if cleaned > 0 {
                        info!(cleaned, "sweep removed expired entries");
                    } else {
                        debug!("sweep found nothing expired");
                    }
                }
                _ = signal.changed() => {
                    info!("sweep task stopping");
                    break;
                }
            }
        }
    });

    SweepHandle { shutdown, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::models::UserProfile;

    fn short_ttl_config() -> CacheConfig {
        CacheConfig {
            user_ttl: Duration::from_millis(10),
            ..CacheConfig::default()
        }
    }

    fn profile(handle: &str) -> UserProfile {
        UserProfile {
            handle: handle.to_string(),
            tier: 10,
            rating: 1200,
            solved_count: 50,
            rank: 1000,
        }
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let cache = Arc::new(RwLock::new(CacheStore::new(short_ttl_config())));

        {
            let mut store = cache.write().await;
            store.set_user("expire_soon", profile("expire_soon"));
        }

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(50));

        // Entry expires after 10ms; the first sweep tick lands at 50ms.
        tokio::time::sleep(Duration::from_millis(120)).await;

        {
            let store = cache.read().await;
            assert_eq!(store.stats().users, 0);
        }

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let cache = Arc::new(RwLock::new(CacheStore::new(CacheConfig::default())));

        {
            let mut store = cache.write().await;
            store.set_user("long_lived", profile("long_lived"));
        }

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(120)).await;

        {
            let store = cache.read().await;
            assert!(store.get_user("long_lived").is_some());
        }

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_sweep_task_stops_on_signal() {
        let cache = Arc::new(RwLock::new(CacheStore::new(CacheConfig::default())));

        let handle = spawn_sweep_task(cache, Duration::from_secs(300));
        assert!(!handle.is_finished());

        handle.stop().await;
    }
}
