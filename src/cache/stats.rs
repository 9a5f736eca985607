//! Cache Statistics Module
//!
//! Per-category entry counts and hit/miss counters, snapshotted for
//! operator-facing diagnostics.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// A point-in-time snapshot of cache occupancy and effectiveness.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Entries in the user profile partition
    pub users: usize,
    /// Entries in the top-100 solved list partition
    pub top100: usize,
    /// Entries in the extended attributes partition
    pub additional: usize,
    /// Entries in the organization memberships partition
    pub organizations: usize,
    /// Number of successful cache reads
    pub hits: u64,
    /// Number of reads that found nothing, or only an expired entry
    pub misses: u64,
    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl CacheStats {
    // == Total Entries ==
    /// Total entries across all four partitions.
    pub fn total_entries(&self) -> usize {
        self.users + self.top100 + self.additional + self.organizations
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
