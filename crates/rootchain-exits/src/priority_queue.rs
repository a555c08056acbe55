//! Per-asset exit queue.
//!
//! A min-heap over [`ExitPriority`]: the exit that matures first is on top,
//! and exits maturing at the same instant leave in output-position order.
//! `BinaryHeap` is a max-heap, so entries are stored as `Reverse`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rootchain_types::{ExitPriority, Result, RootChainError};

/// Min-priority queue of pending exits for one asset.
#[derive(Debug, Clone, Default)]
pub struct ExitQueue {
    heap: BinaryHeap<Reverse<ExitPriority>>,
}

impl ExitQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. O(log n).
    pub fn insert(&mut self, priority: ExitPriority) {
        self.heap.push(Reverse(priority));
    }

    /// The entry that leaves next.
    ///
    /// # Errors
    /// `EmptyQueue` if there are no entries.
    pub fn min(&self) -> Result<ExitPriority> {
        self.heap
            .peek()
            .map(|Reverse(p)| *p)
            .ok_or(RootChainError::EmptyQueue)
    }

    /// Remove and return the entry that leaves next. O(log n).
    ///
    /// # Errors
    /// `EmptyQueue` if there are no entries.
    pub fn delete_min(&mut self) -> Result<ExitPriority> {
        self.heap
            .pop()
            .map(|Reverse(p)| p)
            .ok_or(RootChainError::EmptyQueue)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
