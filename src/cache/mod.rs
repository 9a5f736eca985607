//! Cache Module
//!
//! Category-partitioned in-memory caching for ranking API payloads, with TTL
//! expiration driven by a lazily-swept expiration queue.

pub(crate) mod entry;
mod queue;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use queue::{ExpireEntry, ExpireQueue};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Category ==
/// The four independent cache partitions, one per upstream endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Core user profile (most volatile, shortest TTL)
    UserInfo,
    /// Top-100 solved problem list
    Top100,
    /// Extended profile attributes
    Additional,
    /// Organization memberships (least volatile, longest TTL)
    Organizations,
}

impl Category {
    /// Stable name used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Category::UserInfo => "user_info",
            Category::Top100 => "top100",
            Category::Additional => "additional",
            Category::Organizations => "organizations",
        }
    }
}
