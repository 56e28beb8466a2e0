//! Dense pairwise similarity for item-to-item queries.
//!
//! Scores are plain dot products of L2-normalized content documents, so
//! they equal cosine similarity. Numeric features play no part here.
//!
//! Building is `O(N² · d)`: fine for a personal library of a few thousand
//! books, not meant to go further.

use crate::SparseVector;
use rayon::prelude::*;
use std::cmp::Ordering;

/// `N × N` cosine similarity matrix over one model's vectors
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build from unit-length (or zero) vectors in corpus order. Rows are
    /// computed in parallel once `vectors.len() >= parallel_threshold`.
    pub fn build(vectors: &[SparseVector], parallel_threshold: usize) -> Self {
        let n = vectors.len();
        let mut scores = vec![0.0f32; n * n];

        if n == 0 {
            return Self { n, scores };
        }

        let fill_row = |(i, row): (usize, &mut [f32])| {
            let vi = &vectors[i];
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = vi.dot(&vectors[j]).clamp(0.0, 1.0);
            }
        };

        if n >= parallel_threshold {
            scores.par_chunks_mut(n).enumerate().for_each(fill_row);
        } else {
            scores.chunks_mut(n).enumerate().for_each(fill_row);
        }

        Self { n, scores }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn score(&self, i: usize, j: usize) -> f32 {
        self.scores[i * self.n + j]
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.scores[i * self.n..(i + 1) * self.n]
    }

    /// Up to `top_n` other items ordered by descending score. Ties keep
    /// corpus order; the item itself is never returned.
    pub fn similar_to(&self, i: usize, top_n: usize) -> Vec<(usize, f32)> {
        let mut candidates: Vec<(usize, f32)> = self
            .row(i)
            .iter()
            .copied()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .collect();

        // Stable sort
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        candidates.truncate(top_n.min(self.n.saturating_sub(1)));
        candidates
    }
}
