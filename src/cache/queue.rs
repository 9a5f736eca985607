//! Expiration Queue Module
//!
//! Min-heap of pending expirations with O(1) invalidation of superseded keys.
//!
//! Each heap entry shares a deadline cell with the store's key index. An
//! overwrite zeroes the cell (a tombstone) instead of searching the heap; the
//! dead entry is discarded the next time it reaches the root during a sweep.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use super::Category;

/// Deadline cell shared between a heap entry and the key index.
///
/// Holds the expiration timestamp in Unix milliseconds; [`TOMBSTONE`] marks the
/// entry as logically dead.
pub type DeadlineCell = Arc<AtomicU64>;

/// Sentinel deadline marking a heap entry as invalidated.
pub const TOMBSTONE: u64 = 0;

/// Marks a deadline cell as dead without touching the heap.
pub fn tombstone(cell: &DeadlineCell) {
    cell.store(TOMBSTONE, AtomicOrdering::Relaxed);
}

// == Expire Entry ==
/// A pending expiration for one cached key.
///
/// Ordering uses the deadline captured at push time, so a later tombstone does
/// not disturb the heap: the entry keeps its position and is dropped at the
/// root.
#[derive(Debug)]
pub struct ExpireEntry {
    /// The cache partition the key lives in
    pub category: Category,
    /// The handle the entry expires
    pub key: String,
    /// Deadline at push time (Unix milliseconds)
    deadline: u64,
    /// Shared cell, zeroed when a newer set supersedes this entry
    cell: DeadlineCell,
}

impl ExpireEntry {
    /// Creates a new entry and returns it together with its shared cell.
    ///
    /// The caller stores the cell in the key index so a later overwrite can
    /// invalidate this entry in O(1).
    pub fn new(category: Category, key: String, deadline_ms: u64) -> (Self, DeadlineCell) {
        let cell = Arc::new(AtomicU64::new(deadline_ms));
        let entry = Self {
            category,
            key,
            deadline: deadline_ms,
            cell: Arc::clone(&cell),
        };
        (entry, cell)
    }

    /// The deadline this entry was pushed with (Unix milliseconds).
    pub fn deadline(&self) -> u64 {
        self.deadline
    }

    /// True when a newer set for the same key has invalidated this entry.
    pub fn is_tombstoned(&self) -> bool {
        self.cell.load(AtomicOrdering::Relaxed) == TOMBSTONE
    }

    /// The shared deadline cell.
    pub fn cell(&self) -> &DeadlineCell {
        &self.cell
    }
}

// `BinaryHeap` is a max-heap; reversing the comparison yields a min-heap on
// the push-time deadline.
impl Ord for ExpireEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.deadline.cmp(&self.deadline)
    }
}

impl PartialOrd for ExpireEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ExpireEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline
    }
}

impl Eq for ExpireEntry {}

// == Expire Queue ==
/// Min-heap over pending expirations, consulted only by the sweep.
#[derive(Debug, Default)]
pub struct ExpireQueue {
    heap: BinaryHeap<ExpireEntry>,
}

impl ExpireQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Pushes a pending expiration. O(log n).
    pub fn push(&mut self, entry: ExpireEntry) {
        self.heap.push(entry);
    }

    /// Returns the entry with the earliest push-time deadline.
    pub fn peek(&self) -> Option<&ExpireEntry> {
        self.heap.peek()
    }

    /// Removes and returns the entry with the earliest push-time deadline.
    pub fn pop(&mut self) -> Option<ExpireEntry> {
        self.heap.pop()
    }

    /// Number of pending entries, tombstoned ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when no entries are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
