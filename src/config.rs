//! Configuration Module
//!
//! Loads cache and limiter tuning parameters from environment variables.

use std::env;
use std::time::Duration;

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// == Cache Config ==
/// Cache tuning parameters: one TTL per data category plus sweep bounds.
///
/// TTLs are fixed at construction time, not configurable per call. Volatile
/// profile data gets the shortest TTL; organization data changes rarely and
/// gets the longest.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for user profiles
    pub user_ttl: Duration,
    /// TTL for top-100 solved lists
    pub top100_ttl: Duration,
    /// TTL for extended profile attributes
    pub additional_ttl: Duration,
    /// TTL for organization memberships
    pub organization_ttl: Duration,
    /// Interval between background sweep ticks
    pub sweep_interval: Duration,
    /// Maximum entries removed per sweep invocation
    pub sweep_batch_size: usize,
    /// Wall-clock budget for one sweep invocation
    pub sweep_max_duration: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `USER_TTL_SECS` - User profile TTL (default: 600)
    /// - `TOP100_TTL_SECS` - Top-100 list TTL (default: 1800)
    /// - `ADDITIONAL_TTL_SECS` - Extended attributes TTL (default: 1800)
    /// - `ORG_TTL_SECS` - Organization TTL (default: 7200)
    /// - `SWEEP_INTERVAL_SECS` - Sweep tick interval (default: 300)
    /// - `SWEEP_BATCH_SIZE` - Max entries removed per sweep (default: 500)
    /// - `SWEEP_MAX_DURATION_MS` - Per-sweep time budget (default: 50)
    pub fn from_env() -> Self {
        Self {
            user_ttl: Duration::from_secs(env_u64("USER_TTL_SECS", 600)),
            top100_ttl: Duration::from_secs(env_u64("TOP100_TTL_SECS", 1800)),
            additional_ttl: Duration::from_secs(env_u64("ADDITIONAL_TTL_SECS", 1800)),
            organization_ttl: Duration::from_secs(env_u64("ORG_TTL_SECS", 7200)),
            sweep_interval: Duration::from_secs(env_u64("SWEEP_INTERVAL_SECS", 300)),
            sweep_batch_size: env_usize("SWEEP_BATCH_SIZE", 500),
            sweep_max_duration: Duration::from_millis(env_u64("SWEEP_MAX_DURATION_MS", 50)),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            user_ttl: Duration::from_secs(600),
            top100_ttl: Duration::from_secs(1800),
            additional_ttl: Duration::from_secs(1800),
            organization_ttl: Duration::from_secs(7200),
            sweep_interval: Duration::from_secs(300),
            sweep_batch_size: 500,
            sweep_max_duration: Duration::from_millis(50),
        }
    }
}

// == Limiter Config ==
/// Adaptive concurrency limiter tuning parameters.
#[derive(Debug, Clone)]
pub struct LimiterConfig {
    /// Lower bound for the permit limit
    pub min_limit: usize,
    /// Upper bound for the permit limit
    pub max_limit: usize,
    /// Starting permit limit, clamped into [min_limit, max_limit]
    pub initial_limit: usize,
    /// Capacity of the sliding response-time window
    pub window_size: usize,
    /// Samples required before any adjustment runs
    pub min_samples: usize,
    /// Average latency above this lowers the limit
    pub adjust_threshold: Duration,
    /// Approximate p95 latency above this lowers the limit
    pub decrease_threshold: Duration,
    /// Minimum time between adjustment evaluations
    pub cooldown: Duration,
    /// Consecutive raises allowed before the limiter holds steady
    pub max_successive_increases: u32,
}

impl LimiterConfig {
    /// Creates a new LimiterConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LIMITER_MIN` - Minimum permit limit (default: 1)
    /// - `LIMITER_MAX` - Maximum permit limit (default: 8)
    /// - `LIMITER_INITIAL` - Starting permit limit (default: 3)
    /// - `LATENCY_WINDOW_SIZE` - Sliding window capacity (default: 50)
    /// - `LATENCY_MIN_SAMPLES` - Samples before adjusting (default: 10)
    /// - `ADJUST_THRESHOLD_MS` - Average latency threshold (default: 800)
    /// - `DECREASE_THRESHOLD_MS` - p95 latency threshold (default: 2000)
    /// - `ADJUST_COOLDOWN_SECS` - Cooldown between adjustments (default: 10)
    /// - `MAX_SUCCESSIVE_INCREASES` - Raise streak cap (default: 3)
    pub fn from_env() -> Self {
        Self {
            min_limit: env_usize("LIMITER_MIN", 1),
            max_limit: env_usize("LIMITER_MAX", 8),
            initial_limit: env_usize("LIMITER_INITIAL", 3),
            window_size: env_usize("LATENCY_WINDOW_SIZE", 50),
            min_samples: env_usize("LATENCY_MIN_SAMPLES", 10),
            adjust_threshold: Duration::from_millis(env_u64("ADJUST_THRESHOLD_MS", 800)),
            decrease_threshold: Duration::from_millis(env_u64("DECREASE_THRESHOLD_MS", 2000)),
            cooldown: Duration::from_secs(env_u64("ADJUST_COOLDOWN_SECS", 10)),
            max_successive_increases: env_u64("MAX_SUCCESSIVE_INCREASES", 3) as u32,
        }
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            min_limit: 1,
            max_limit: 8,
            initial_limit: 3,
            window_size: 50,
            min_samples: 10,
            adjust_threshold: Duration::from_millis(800),
            decrease_threshold: Duration::from_millis(2000),
            cooldown: Duration::from_secs(10),
            max_successive_increases: 3,
        }
    }
}
