//! Cache Entry Module
//!
//! Defines the expiring slot stored for each cached upstream payload.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A cached payload together with its absolute expiration timestamp.
///
/// Entries are overwritten, never merged: a repeated set for the same key
/// replaces the whole entry and restarts its lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub value: T,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    pub fn new(value: T, ttl: Duration) -> Self {
        let now = now_millis();
        Self {
            value,
            created_at: now,
            expires_at: now + ttl.as_millis() as u64,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is greater
    /// than or equal to `expires_at`, so a read at the exact expiration instant
    /// is already a miss.
    pub fn is_expired(&self) -> bool {
        now_millis() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining lifetime in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(now_millis())
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
