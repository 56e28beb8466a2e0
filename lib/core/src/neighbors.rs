//! Exact nearest-neighbor index under cosine distance.

use crate::HybridVector;
use ordered_float::OrderedFloat;
use std::collections::BinaryHeap;

/// Candidate ordered by `(distance, corpus index)`; the heap top is the
/// worst candidate kept so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    dist: OrderedFloat<f32>,
    idx: usize,
}

/// Flat index: every query scans all vectors and keeps the best `k` in a
/// bounded max-heap.
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    /// Unit-length copies of the indexed vectors
    vectors: Vec<HybridVector>,
}

impl NeighborIndex {
    pub fn build(vectors: &[HybridVector]) -> Self {
        Self {
            vectors: vectors.iter().map(HybridVector::normalized).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Cosine distance `1 - cos(query, item)`, in `[0, 2]`. A zero vector on
    /// either side is at distance 1.
    #[inline]
    pub fn distance(&self, query: &HybridVector, idx: usize) -> f32 {
        let item = &self.vectors[idx];
        let query_norm = query.norm();
        let item_norm = item.norm();
        if query_norm <= f32::EPSILON || item_norm <= f32::EPSILON {
            return 1.0;
        }
        (1.0 - query.dot(item) / (query_norm * item_norm)).clamp(0.0, 2.0)
    }

    /// The `k` closest items as `(index, distance)`, ascending by distance,
    /// ties by corpus order.
    pub fn nearest(&self, query: &HybridVector, k: usize) -> Vec<(usize, f32)> {
        if k == 0 || self.vectors.is_empty() {
            return Vec::new();
        }

        let query = query.normalized();
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);

        for idx in 0..self.vectors.len() {
            let candidate = Candidate {
                dist: OrderedFloat(self.distance(&query, idx)),
                idx,
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if let Some(worst) = heap.peek() {
                if candidate < *worst {
                    heap.pop();
                    heap.push(candidate);
                }
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|c| (c.idx, c.dist.into_inner()))
            .collect()
    }
}
