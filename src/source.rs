//! Upstream Ranking Source
//!
//! Interface implemented by the ranking API client. The cache core performs no
//! network I/O of its own: callers fetch through this trait outside the cache
//! lock, report the elapsed time to the limiter, and write successful results
//! back through the store façade.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AdditionalInfo, Organization, Top100, UserProfile};

/// One fetch method per cache category.
#[async_trait]
pub trait RankingSource: Send + Sync {
    /// Fetches the core profile for a handle.
    async fn fetch_user(&self, handle: &str) -> Result<UserProfile>;

    /// Fetches the top-100 solved list for a handle.
    async fn fetch_top100(&self, handle: &str) -> Result<Top100>;

    /// Fetches extended profile attributes for a handle.
    async fn fetch_additional(&self, handle: &str) -> Result<AdditionalInfo>;

    /// Fetches organization memberships for a handle.
    async fn fetch_organizations(&self, handle: &str) -> Result<Vec<Organization>>;
}
