//! Rankcache - caching core for a competitive-programming leaderboard bot
//!
//! Provides a category-partitioned TTL cache for ranking API payloads, swept
//! by a bounded background task, plus an adaptive limit on concurrent upstream
//! requests.

pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod source;
pub mod tasks;

pub use cache::{CacheStats, CacheStore, Category};
pub use config::{CacheConfig, LimiterConfig};
pub use error::{FetchError, Result};
pub use limiter::{AdaptiveLimiter, LimiterStats};
pub use models::{AdditionalInfo, Organization, RankedProblem, Top100, UserProfile};
pub use source::RankingSource;
pub use tasks::{spawn_sweep_task, warm_profiles, SweepHandle, WarmupReport};
