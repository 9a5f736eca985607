//! Cache Store Module
//!
//! Category-partitioned TTL cache with a heap-swept expiration queue.
//!
//! The store holds one map per data category plus a single expiration queue and
//! key index covering all of them. Reads are lazy: an expired entry counts as a
//! miss immediately, whether or not the sweep has removed it yet. Overwrites
//! tombstone the superseded queue entry instead of searching the heap; physical
//! removal happens when the dead entry surfaces at the root during a sweep.
//!
//! Callers share the store behind a single reader-writer lock: reads take the
//! shared side, sets and sweeps the exclusive side. Upstream fetches never run
//! under the lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use crate::cache::entry::now_millis;
use crate::cache::queue::{self, DeadlineCell, ExpireEntry, ExpireQueue};
use crate::cache::{CacheEntry, CacheStats, Category};
use crate::config::CacheConfig;
use crate::models::{AdditionalInfo, Organization, Top100, UserProfile};

// == Cache Store ==
/// In-memory cache for ranking API payloads, partitioned by category.
#[derive(Debug)]
pub struct CacheStore {
    /// User profile partition
    users: HashMap<String, CacheEntry<UserProfile>>,
    /// Top-100 solved list partition
    top100: HashMap<String, CacheEntry<Top100>>,
    /// Extended attributes partition
    additional: HashMap<String, CacheEntry<AdditionalInfo>>,
    /// Organization memberships partition
    organizations: HashMap<String, CacheEntry<Vec<Organization>>>,
    /// Pending expirations across all partitions
    queue: ExpireQueue,
    /// Live deadline cell per key; at most one non-tombstoned cell per key
    index: HashMap<(Category, String), DeadlineCell>,
    /// TTLs and sweep bounds
    config: CacheConfig,
    /// Successful reads (updated under the shared lock)
    hits: AtomicU64,
    /// Absent-or-expired reads (updated under the shared lock)
    misses: AtomicU64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store with the given TTL and sweep configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            users: HashMap::new(),
            top100: HashMap::new(),
            additional: HashMap::new(),
            organizations: HashMap::new(),
            queue: ExpireQueue::new(),
            index: HashMap::new(),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    // == Get ==
    /// Retrieves a cached user profile, if present and not expired.
    pub fn get_user(&self, handle: &str) -> Option<UserProfile> {
        self.lookup(&self.users, handle)
    }

    /// Retrieves a cached top-100 solved list, if present and not expired.
    pub fn get_top100(&self, handle: &str) -> Option<Top100> {
        self.lookup(&self.top100, handle)
    }

    /// Retrieves cached extended attributes, if present and not expired.
    pub fn get_additional(&self, handle: &str) -> Option<AdditionalInfo> {
        self.lookup(&self.additional, handle)
    }

    /// Retrieves cached organization memberships, if present and not expired.
    pub fn get_organizations(&self, handle: &str) -> Option<Vec<Organization>> {
        self.lookup(&self.organizations, handle)
    }

    // == Set ==
    /// Caches a user profile, overwriting any existing entry for the handle.
    pub fn set_user(&mut self, handle: impl Into<String>, profile: UserProfile) {
        let handle = handle.into();
        let entry = CacheEntry::new(profile, self.config.user_ttl);
        self.track(Category::UserInfo, handle.clone(), entry.expires_at);
        self.users.insert(handle, entry);
    }

    /// Caches a top-100 solved list, overwriting any existing entry.
    pub fn set_top100(&mut self, handle: impl Into<String>, top100: Top100) {
        let handle = handle.into();
        let entry = CacheEntry::new(top100, self.config.top100_ttl);
        self.track(Category::Top100, handle.clone(), entry.expires_at);
        self.top100.insert(handle, entry);
    }

    /// Caches extended attributes, overwriting any existing entry.
    pub fn set_additional(&mut self, handle: impl Into<String>, info: AdditionalInfo) {
        let handle = handle.into();
        let entry = CacheEntry::new(info, self.config.additional_ttl);
        self.track(Category::Additional, handle.clone(), entry.expires_at);
        self.additional.insert(handle, entry);
    }

    /// Caches organization memberships, overwriting any existing entry.
    pub fn set_organizations(&mut self, handle: impl Into<String>, orgs: Vec<Organization>) {
        let handle = handle.into();
        let entry = CacheEntry::new(orgs, self.config.organization_ttl);
        self.track(Category::Organizations, handle.clone(), entry.expires_at);
        self.organizations.insert(handle, entry);
    }

    // == Stats ==
    /// Returns a snapshot of per-category counts and hit/miss counters.
    ///
    /// Counts include entries that have expired but not yet been swept.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            users: self.users.len(),
            top100: self.top100.len(),
            additional: self.additional.len(),
            organizations: self.organizations.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            taken_at: Utc::now(),
        }
    }

    // == Clear ==
    /// Drops every entry by replacing all partitions, the queue and the index
    /// with fresh structures. Hit/miss counters survive.
    pub fn clear(&mut self) {
        self.users = HashMap::new();
        self.top100 = HashMap::new();
        self.additional = HashMap::new();
        self.organizations = HashMap::new();
        self.queue = ExpireQueue::new();
        self.index = HashMap::new();
        debug!("cache cleared");
    }

    // == Sweep ==
    /// Removes expired and tombstoned entries, bounded by the configured batch
    /// size and wall-clock budget. Returns the number of queue entries cleaned.
    ///
    /// The heap orders entries by deadline, so the first live entry with a
    /// future deadline proves nothing later in the heap is expired either.
    ///
    /// The time budget gates continuation, not the first pop: every invocation
    /// cleans at least one dead entry when one exists, so even a zero budget
    /// cannot stall reclamation.
    pub fn sweep(&mut self) -> usize {
        let started = Instant::now();
        let now = now_millis();
        let mut cleaned = 0;

        while cleaned < self.config.sweep_batch_size {
            if cleaned > 0 && started.elapsed() >= self.config.sweep_max_duration {
                break;
            }

            let (tombstoned, expired) = match self.queue.peek() {
                None => break,
                Some(root) => (root.is_tombstoned(), root.deadline() <= now),
            };

            if tombstoned {
                if let Some(dead) = self.queue.pop() {
                    self.release_index_slot(&dead);
                    cleaned += 1;
                }
            } else if expired {
                if let Some(dead) = self.queue.pop() {
                    self.release_index_slot(&dead);
                    self.remove_value(dead.category, &dead.key);
                    debug!(
                        category = dead.category.name(),
                        key = %dead.key,
                        "swept expired entry"
                    );
                    cleaned += 1;
                }
            } else {
                break;
            }
        }

        if cleaned > 0 {
            debug!(cleaned, "sweep removed queue entries");
        }
        cleaned
    }

    // == Length ==
    /// Total entries across all partitions, swept or not.
    pub fn len(&self) -> usize {
        self.users.len() + self.top100.len() + self.additional.len() + self.organizations.len()
    }

    /// True when every partition is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Internals ==
    /// Shared read path for all four partitions.
    fn lookup<T: Clone>(&self, partition: &HashMap<String, CacheEntry<T>>, handle: &str) -> Option<T> {
        match partition.get(handle) {
            Some(entry) if !entry.is_expired() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            // Absent and lazily-expired both read as misses; removal is the
            // sweep's job.
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Tombstones any live queue entry for the key, then pushes a fresh one.
    fn track(&mut self, category: Category, key: String, deadline_ms: u64) {
        let slot = (category, key.clone());
        if let Some(superseded) = self.index.get(&slot) {
            queue::tombstone(superseded);
        }
        let (entry, cell) = ExpireEntry::new(category, key, deadline_ms);
        self.queue.push(entry);
        self.index.insert(slot, cell);
    }

    /// Frees the key's index slot, but only if this queue entry still owns it.
    /// After an overwrite the slot belongs to the successor entry.
    fn release_index_slot(&mut self, dead: &ExpireEntry) {
        let slot = (dead.category, dead.key.clone());
        let owned = self
            .index
            .get(&slot)
            .is_some_and(|cell| Arc::ptr_eq(cell, dead.cell()));
        if owned {
            self.index.remove(&slot);
        }
    }

    /// Deletes the cached value behind a swept queue entry.
    fn remove_value(&mut self, category: Category, key: &str) {
        match category {
            Category::UserInfo => {
                self.users.remove(key);
            }
            Category::Top100 => {
                self.top100.remove(key);
            }
            Category::Additional => {
                self.additional.remove(key);
            }
            Category::Organizations => {
                self.organizations.remove(key);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_expirations(&self) -> usize {
        self.queue.len()
    }

    #[cfg(test)]
    pub(crate) fn tracked_keys(&self) -> usize {
        self.index.len()
    }
}
