//! Warm-up Task
//!
//! Bulk-prefetches user profiles ahead of a scoring pass. Fan-out is gated by
//! a semaphore sized from the adaptive limiter so a large roster cannot
//! stampede the upstream API, and every attempt reports its latency back to
//! the limiter.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{RwLock, Semaphore};
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::limiter::AdaptiveLimiter;
use crate::source::RankingSource;

// == Warmup Report ==
/// Outcome of one warm-up pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarmupReport {
    /// Profiles fetched and written to the cache
    pub fetched: usize,
    /// Fetches that failed and were not written back
    pub failed: usize,
}

/// Prefetches user profiles for a set of handles.
///
/// At most `limiter.current_limit()` fetches run concurrently, reading the
/// limit once at the start of the pass. Failed fetches are logged and skipped:
/// the handle stays a cache miss and the next consumer retries upstream.
pub async fn warm_profiles(
    cache: Arc<RwLock<CacheStore>>,
    limiter: Arc<AdaptiveLimiter>,
    source: Arc<dyn RankingSource>,
    handles: &[String],
) -> WarmupReport {
    let permits = Arc::new(Semaphore::new(limiter.current_limit()));
    let mut tasks = Vec::with_capacity(handles.len());

    for handle in handles {
        let permits = Arc::clone(&permits);
        let cache = Arc::clone(&cache);
        let limiter = Arc::clone(&limiter);
        let source = Arc::clone(&source);
        let handle = handle.clone();

        tasks.push(tokio::spawn(async move {
            let Ok(_permit) = permits.acquire().await else {
                // Semaphore closed; treat as a skipped fetch.
                return false;
            };

            let started = Instant::now();
            let result = source.fetch_user(&handle).await;
            limiter.record_response_time(started.elapsed());

            match result {
                Ok(profile) => {
                    cache.write().await.set_user(handle, profile);
                    true
                }
                Err(err) => {
                    warn!(%handle, error = %err, "warm-up fetch failed");
                    false
                }
            }
        }));
    }

    let mut report = WarmupReport::default();
    for task in tasks {
        match task.await {
            Ok(true) => report.fetched += 1,
            _ => report.failed += 1,
        }
    }

    debug!(
        fetched = report.fetched,
        failed = report.failed,
        "warm-up pass complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::config::{CacheConfig, LimiterConfig};
    use crate::error::{FetchError, Result};
    use crate::models::{AdditionalInfo, Organization, Top100, UserProfile};

    /// Fake upstream that tracks peak in-flight concurrency.
    struct FakeSource {
        failing: HashSet<String>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FakeSource {
        fn new(failing: &[&str]) -> Self {
            Self {
                failing: failing.iter().map(|s| s.to_string()).collect(),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl RankingSource for FakeSource {
        async fn fetch_user(&self, handle: &str) -> Result<UserProfile> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(handle) {
                return Err(FetchError::Status(500));
            }
            Ok(UserProfile {
                handle: handle.to_string(),
                tier: 12,
                rating: 1400,
                solved_count: 77,
                rank: 512,
            })
        }

        async fn fetch_top100(&self, _handle: &str) -> Result<Top100> {
            Err(FetchError::Status(500))
        }

        async fn fetch_additional(&self, _handle: &str) -> Result<AdditionalInfo> {
            Err(FetchError::Status(500))
        }

        async fn fetch_organizations(&self, _handle: &str) -> Result<Vec<Organization>> {
            Err(FetchError::Status(500))
        }
    }

    fn setup() -> (Arc<RwLock<CacheStore>>, Arc<AdaptiveLimiter>) {
        let cache = Arc::new(RwLock::new(CacheStore::new(CacheConfig::default())));
        let limiter = Arc::new(AdaptiveLimiter::new(LimiterConfig {
            initial_limit: 2,
            ..LimiterConfig::default()
        }));
        (cache, limiter)
    }

    fn handles(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("user{}", i)).collect()
    }

    #[tokio::test]
    async fn test_warmup_fills_cache() {
        let (cache, limiter) = setup();
        let source = Arc::new(FakeSource::new(&[]));

        let report = warm_profiles(cache.clone(), limiter, source, &handles(5)).await;

        assert_eq!(report, WarmupReport { fetched: 5, failed: 0 });
        let store = cache.read().await;
        assert_eq!(store.stats().users, 5);
        assert!(store.get_user("user3").is_some());
    }

    #[tokio::test]
    async fn test_warmup_respects_permit_bound() {
        let (cache, limiter) = setup();
        let source = Arc::new(FakeSource::new(&[]));

        let bound = limiter.current_limit();
        warm_profiles(cache, limiter, source.clone(), &handles(12)).await;

        assert!(
            source.peak() <= bound,
            "peak in-flight {} exceeded permit bound {}",
            source.peak(),
            bound
        );
    }

    #[tokio::test]
    async fn test_warmup_skips_failed_fetches() {
        let (cache, limiter) = setup();
        let source = Arc::new(FakeSource::new(&["user1", "user3"]));

        let report = warm_profiles(cache.clone(), limiter.clone(), source, &handles(5)).await;

        assert_eq!(report.fetched, 3);
        assert_eq!(report.failed, 2);

        let store = cache.read().await;
        assert!(store.get_user("user1").is_none());
        assert!(store.get_user("user0").is_some());

        // Failed calls still report latency: one sample per attempted fetch.
        assert_eq!(limiter.stats().window_len, 5);
    }
}
