//! Bounded binary heap keeping the k nearest training indices seen so far.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use ordered_float::OrderedFloat; // Total order over f64, NaN sorts last

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A training point reached from a query: its index and squared distance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

/// Heap entry ordered by `(distance, index)`.
#[derive(Debug)]
struct HeapElement {
    distance: OrderedFloat<f64>,
    index: usize,
}

impl HeapElement {
    fn key(&self) -> (OrderedFloat<f64>, usize) {
        (self.distance, self.index)
    }
}

impl PartialEq for HeapElement {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl Eq for HeapElement {}

impl PartialOrd for HeapElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapElement {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: the worst kept neighbor (largest distance, then largest
        // index) sits on top and is the one evicted.
        self.key().cmp(&other.key())
    }
}

/// Keeps the `capacity` smallest `(distance, index)` pairs.
///
/// Ties on distance are resolved towards the lower index, so the kept set is
/// exactly the first `capacity` entries of a stable sort by distance.
#[derive(Debug)]
pub struct KBestNeighbors {
    capacity: usize,
    heap: BinaryHeap<HeapElement>,
}

impl KBestNeighbors {
    pub fn new(capacity: usize) -> Self {
        KBestNeighbors {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1), // +1 for push-then-pop
        }
    }

    pub fn add(&mut self, distance: f64, index: usize) {
        if self.capacity == 0 {
            return;
        }
        let item = HeapElement { distance: OrderedFloat(distance), index };
        if self.heap.len() < self.capacity {
            self.heap.push(item);
            return;
        }
        let replaces_top = self.heap.peek().is_some_and(|top| item < *top);
        if replaces_top {
            self.heap.pop();
            self.heap.push(item);
        }
    }

    /// Kept neighbors, nearest first.
    pub fn into_sorted_neighbors(self) -> Vec<Neighbor> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|elem| Neighbor { index: elem.index, distance: elem.distance.0 })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
