//! This module contains a fixed-capacity binary max-heap used to keep the k best neighbors.

use std::cmp::Ordering;

use ordered_float::OrderedFloat; // Total ordering for f64 keys

use crate::error::{KnnError, Result};

/// A (distance, label) pair scored for one query against one training point.
#[derive(Debug, Clone)]
pub struct Candidate<L> {
    pub distance: OrderedFloat<f64>, // Heap key
    pub label: L,
}

impl<L> Candidate<L> {
    pub fn new(distance: f64, label: L) -> Self {
        Candidate { distance: OrderedFloat(distance), label }
    }

    pub fn distance(&self) -> f64 {
        self.distance.0
    }
}

impl<L> PartialEq for Candidate<L> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}
impl<L> Eq for Candidate<L> {}

impl<L> PartialOrd for Candidate<L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<L> Ord for Candidate<L> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Only the distance takes part in ordering; labels never break ties.
        self.distance.cmp(&other.distance)
    }
}

/// A binary max-heap that never holds more than `capacity` elements.
///
/// Unlike a self-evicting top-k buffer, a full heap rejects `insert` with
/// [`KnnError::CapacityExceeded`]; the caller decides whether to evict by
/// comparing against [`peek_max`](Self::peek_max) first.
///
/// Storage is a contiguous buffer in level order: the children of slot `i`
/// live at `2i + 1` and `2i + 2`.
#[derive(Debug, Clone)]
pub struct BoundedMaxHeap<T> {
    capacity: usize,
    items: Vec<T>,
}

impl<T: Ord> BoundedMaxHeap<T> {
    /// Creates an empty heap. Fails with `InvalidArgument` if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(KnnError::InvalidArgument(
                "bounded heap capacity must be greater than 0".into(),
            ));
        }
        Ok(BoundedMaxHeap {
            capacity,
            items: Vec::with_capacity(capacity),
        })
    }

    /// Inserts `item`, sifting it up past every parent with a smaller key.
    pub fn insert(&mut self, item: T) -> Result<()> {
        if self.is_full() {
            return Err(KnnError::CapacityExceeded { capacity: self.capacity });
        }
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
        Ok(())
    }

    /// Removes and returns the largest element.
    pub fn remove_max(&mut self) -> Result<T> {
        if self.items.is_empty() {
            return Err(KnnError::EmptyQueue);
        }
        // swap_remove moves the last element into the root slot.
        let max = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Ok(max)
    }

    pub fn peek_max(&self) -> Result<&T> {
        self.items.first().ok_or(KnnError::EmptyQueue)
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            // Equal keys stop the climb.
            if self.items[pos] > self.items[parent] {
                self.items.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut largest = pos;

            // Left is checked first, so the right child only wins when it is
            // strictly greater than the left.
            if left < len && self.items[left] > self.items[largest] {
                largest = left;
            }
            if right < len && self.items[right] > self.items[largest] {
                largest = right;
            }

            if largest == pos {
                break;
            }
            self.items.swap(pos, largest);
            pos = largest;
        }
    }
}
