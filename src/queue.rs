//! Binary-heap open list.
//!
//! `BinaryHeap` is a max-heap, so entries are wrapped in `Reverse` to pop the
//! smallest key first. Equal keys come out in insertion order.
//!
//! There is no decrease-key. Callers that improve an item's key push a fresh
//! entry and discard the stale one when it surfaces.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::error::EmptyQueueError;

#[derive(Debug)]
struct OpenEntry<T> {
    key: f64,
    seq: u64,
    item: T,
}

impl<T> PartialEq for OpenEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for OpenEntry<T> {}

impl<T> PartialOrd for OpenEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for OpenEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-priority queue keyed by `f64`.
///
/// # Examples
/// ```
/// use ballsort_solver::queue::OpenList;
///
/// let mut open = OpenList::new();
/// open.insert(3.0, "c");
/// open.insert(1.0, "a");
/// open.insert(1.0, "b");
/// assert_eq!(open.extract_min(), Ok((1.0, "a")));
/// assert_eq!(open.extract_min(), Ok((1.0, "b")));
/// assert_eq!(open.len(), 1);
/// ```
#[derive(Debug)]
pub struct OpenList<T> {
    heap: BinaryHeap<Reverse<OpenEntry<T>>>,
    next_seq: u64,
    high_water: usize,
}

impl<T> OpenList<T> {
    pub fn new() -> Self {
        OpenList {
            heap: BinaryHeap::new(),
            next_seq: 0,
            high_water: 0,
        }
    }

    /// Adds `item` with priority `key` in O(log n).
    pub fn insert(&mut self, key: f64, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(OpenEntry { key, seq, item }));
        self.high_water = self.high_water.max(self.heap.len());
    }

    /// Removes and returns the entry with the smallest key in O(log n).
    pub fn extract_min(&mut self) -> Result<(f64, T), EmptyQueueError> {
        self.heap
            .pop()
            .map(|Reverse(entry)| (entry.key, entry.item))
            .ok_or(EmptyQueueError)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of entries, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Largest `len()` observed since construction.
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

impl<T> Default for OpenList<T> {
    fn default() -> Self {
        Self::new()
    }
}
