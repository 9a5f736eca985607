//! Integration Tests for the Cache Engine
//!
//! Exercises the store, sweep task and limiter together the way the bot's
//! command handlers and batch scorers drive them: shared behind locks, from
//! many concurrent tasks.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use rankcache::{
    spawn_sweep_task, AdaptiveLimiter, AdditionalInfo, CacheConfig, CacheStore, LimiterConfig,
    Top100, UserProfile,
};

// == Helper Functions ==

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn profile(handle: &str, rating: u32) -> UserProfile {
    UserProfile {
        handle: handle.to_string(),
        tier: 14,
        rating,
        solved_count: 321,
        rank: 87,
    }
}

fn shared_store(config: CacheConfig) -> Arc<RwLock<CacheStore>> {
    Arc::new(RwLock::new(CacheStore::new(config)))
}

// == Store Behind the Lock ==

#[tokio::test]
async fn test_miss_then_hit_across_tasks() {
    init_tracing();
    let cache = shared_store(CacheConfig::default());

    {
        let store = cache.read().await;
        assert!(store.get_user("u1").is_none());
    }

    let writer = {
        let cache = cache.clone();
        tokio::spawn(async move {
            cache.write().await.set_user("u1", profile("u1", 2000));
        })
    };
    writer.await.unwrap();

    let cached = cache.read().await.get_user("u1").unwrap();
    assert_eq!(cached.rating, 2000);
}

#[tokio::test]
async fn test_clear_resets_every_category() {
    init_tracing();
    let cache = shared_store(CacheConfig::default());

    {
        let mut store = cache.write().await;
        store.set_user("u1", profile("u1", 1500));
        store.set_top100(
            "u1",
            Top100 {
                count: 0,
                problems: vec![],
            },
        );
        store.set_additional(
            "u1",
            AdditionalInfo {
                profile_image_url: None,
                background_id: None,
                badge_id: None,
            },
        );
        store.set_organizations("u1", vec![]);
        assert_eq!(store.stats().total_entries(), 4);
    }

    cache.write().await.clear();

    let store = cache.read().await;
    let stats = store.stats();
    assert_eq!(stats.users, 0);
    assert_eq!(stats.top100, 0);
    assert_eq!(stats.additional, 0);
    assert_eq!(stats.organizations, 0);
    assert!(store.get_user("u1").is_none());
    assert!(store.get_organizations("u1").is_none());
}

#[tokio::test]
async fn test_concurrent_readers_and_writers() {
    init_tracing();
    let cache = shared_store(CacheConfig::default());
    let mut tasks = Vec::new();

    for i in 0..20 {
        let cache = cache.clone();
        tasks.push(tokio::spawn(async move {
            let handle = format!("user{}", i % 5);
            cache
                .write()
                .await
                .set_user(handle.as_str(), profile(&handle, i));
            cache.read().await.get_user(&handle)
        }));
    }

    for task in tasks {
        // Another writer may have overwritten the key, but some complete
        // profile must come back.
        assert!(task.await.unwrap().is_some());
    }

    // 5 distinct handles, each overwritten 4 times.
    let store = cache.read().await;
    assert_eq!(store.stats().users, 5);
}

// == Sweep Task End to End ==

#[tokio::test]
async fn test_sweeper_drains_expired_entries() {
    init_tracing();
    let config = CacheConfig {
        user_ttl: Duration::from_millis(10),
        ..CacheConfig::default()
    };
    let cache = shared_store(config);

    {
        let mut store = cache.write().await;
        for i in 0..25 {
            store.set_user(format!("u{}", i), profile("u", i));
        }
    }

    let sweeper = spawn_sweep_task(cache.clone(), Duration::from_millis(40));
    tokio::time::sleep(Duration::from_millis(150)).await;

    {
        let store = cache.read().await;
        assert_eq!(store.stats().users, 0);
    }

    sweeper.stop().await;
}

#[tokio::test]
async fn test_reads_expire_before_sweep_runs() {
    init_tracing();
    let config = CacheConfig {
        user_ttl: Duration::from_millis(10),
        // A sweep interval far beyond the test runtime: expiry must be
        // visible on the read path alone.
        sweep_interval: Duration::from_secs(300),
        ..CacheConfig::default()
    };
    let cache = shared_store(config);

    cache.write().await.set_user("u1", profile("u1", 1500));
    assert!(cache.read().await.get_user("u1").is_some());

    tokio::time::sleep(Duration::from_millis(20)).await;

    let store = cache.read().await;
    assert!(store.get_user("u1").is_none());
    // Still counted until a sweep physically removes it.
    assert_eq!(store.stats().users, 1);
}

// == Limiter Under Concurrent Reporters ==

#[tokio::test]
async fn test_limiter_accepts_concurrent_reporters() {
    init_tracing();
    let limiter = Arc::new(AdaptiveLimiter::new(LimiterConfig {
        window_size: 32,
        cooldown: Duration::from_secs(60),
        ..LimiterConfig::default()
    }));

    let mut tasks = Vec::new();
    for i in 0..64 {
        let limiter = limiter.clone();
        tasks.push(tokio::spawn(async move {
            limiter.record_response_time(Duration::from_millis(10 + i));
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let stats = limiter.stats();
    assert_eq!(stats.window_len, 32);
    // Cooldown never elapsed, so the limit is untouched.
    assert_eq!(stats.current_limit, LimiterConfig::default().initial_limit);
}

#[tokio::test]
async fn test_stats_snapshot_serializes_for_diagnostics() {
    init_tracing();
    let cache = shared_store(CacheConfig::default());
    cache.write().await.set_user("u1", profile("u1", 1500));

    let stats = cache.read().await.stats();
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["users"], 1);
    assert_eq!(json["organizations"], 0);
}
