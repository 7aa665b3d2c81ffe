//! Min-priority queue of boundary pixels keyed by grey level.

use crate::models::Pixel;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Discovered but not yet processed pixels, lowest grey level first.
///
/// Equal levels pop in insertion order (FIFO). The flood output depends on
/// which of several same-level candidates is merged first, so this rule
/// must stay fixed for results to be reproducible.
#[derive(Debug, Default)]
pub struct BoundaryHeap {
    heap: BinaryHeap<Reverse<(u8, u64, Pixel)>>,
    next_seq: u64,
}

impl BoundaryHeap {
    /// Create an empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty heap sized for `capacity` pixels
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    /// Insert `pixel` with priority `level`
    pub fn push(&mut self, pixel: Pixel, level: u8) {
        self.heap.push(Reverse((level, self.next_seq, pixel)));
        self.next_seq += 1;
    }

    /// Remove the pixel with the smallest level.
    ///
    /// Panics on an empty heap: callers check `is_empty` first.
    pub fn pop_min(&mut self) -> Pixel {
        match self.heap.pop() {
            Some(Reverse((_, _, pixel))) => pixel,
            None => panic!("pop_min on an empty boundary heap"),
        }
    }

    /// True when no boundary pixels remain
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of queued pixels
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
