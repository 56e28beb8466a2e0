use serde::{Deserialize, Serialize};

/// Sparse vector over a fitted vocabulary.
///
/// Indices are kept sorted and unique so that dot products are a single
/// merge pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl SparseVector {
    /// Build from `(index, value)` pairs. Duplicate indices are summed and
    /// zero entries dropped.
    #[must_use]
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(idx, _)| idx);

        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f32> = Vec::with_capacity(pairs.len());
        for (idx, value) in pairs {
            match indices.last() {
                Some(&last) if last == idx => {
                    if let Some(v) = values.last_mut() {
                        *v += value;
                    }
                }
                _ => {
                    indices.push(idx);
                    values.push(value);
                }
            }
        }

        let mut vector = Self { indices, values };
        vector.prune_zeros();
        vector
    }

    fn prune_zeros(&mut self) {
        let mut keep = 0;
        for i in 0..self.values.len() {
            if self.values[i] != 0.0 {
                self.indices[keep] = self.indices[i];
                self.values[keep] = self.values[i];
                keep += 1;
            }
        }
        self.indices.truncate(keep);
        self.values.truncate(keep);
    }

    /// Number of stored (non-zero) entries
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, idx: u32) -> f32 {
        self.indices
            .binary_search(&idx)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product via sorted merge
    #[inline]
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Normalize to unit length. A zero vector stays zero.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.values {
                *x *= inv_norm;
            }
        }
    }
}

/// Fixed-layout `[text..., numeric...]` vector produced by one fitted model.
///
/// `text_dim` is the vocabulary size of the generation that produced it;
/// vectors with different layouts are never compared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HybridVector {
    text: SparseVector,
    numeric: Vec<f32>,
    text_dim: usize,
}

impl HybridVector {
    #[inline]
    #[must_use]
    pub fn new(text: SparseVector, text_dim: usize, numeric: Vec<f32>) -> Self {
        Self {
            text,
            numeric,
            text_dim,
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.text_dim + self.numeric.len()
    }

    #[inline]
    #[must_use]
    pub fn text_dim(&self) -> usize {
        self.text_dim
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &SparseVector {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn numeric(&self) -> &[f32] {
        &self.numeric
    }

    /// Whether `other` shares this vector's layout
    #[inline]
    pub fn same_layout(&self, other: &HybridVector) -> bool {
        self.text_dim == other.text_dim && self.numeric.len() == other.numeric.len()
    }

    #[inline]
    pub fn dot(&self, other: &HybridVector) -> f32 {
        debug_assert!(self.same_layout(other));
        let numeric: f32 = self
            .numeric
            .iter()
            .zip(other.numeric.iter())
            .map(|(a, b)| a * b)
            .sum();
        self.text.dot(&other.text) + numeric
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        let text = self.text.norm();
        let numeric: f32 = self.numeric.iter().map(|x| x * x).sum();
        (text * text + numeric).sqrt()
    }

    /// Compute cosine similarity with another vector. Zero vectors score 0.
    #[inline]
    pub fn cosine_similarity(&self, other: &HybridVector) -> f32 {
        if !self.same_layout(other) {
            return 0.0;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
            return 0.0;
        }

        self.dot(other) / (norm_a * norm_b)
    }

    /// Scale the whole vector to unit length
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.text.values {
                *x *= inv_norm;
            }
            for x in &mut self.numeric {
                *x *= inv_norm;
            }
        }
    }

    /// Get normalized copy
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }

    /// Dense rendering in `[text..., numeric...]` order
    #[must_use]
    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.dim()];
        for (idx, value) in self.text.iter() {
            dense[idx as usize] = value;
        }
        dense[self.text_dim..].copy_from_slice(&self.numeric);
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_from_pairs_merges_and_sorts() {
        let v = SparseVector::from_pairs(vec![(3, 1.0), (1, 2.0), (3, 0.5), (7, 0.0)]);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(1), 2.0);
        assert_eq!(v.get(3), 1.5);
        assert_eq!(v.get(7), 0.0);
    }

    #[test]
    fn test_sparse_dot() {
        let a = SparseVector::from_pairs(vec![(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b = SparseVector::from_pairs(vec![(2, 4.0), (5, 1.0), (9, 8.0)]);
        assert!((a.dot(&b) - 11.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_normalize_stays_zero() {
        let mut v = SparseVector::default();
        v.normalize();
        assert!(v.is_zero());
    }

    #[test]
    fn test_hybrid_cosine_similarity() {
        let a = HybridVector::new(SparseVector::from_pairs(vec![(0, 1.0)]), 2, vec![0.0]);
        let b = HybridVector::new(SparseVector::from_pairs(vec![(0, 2.0)]), 2, vec![0.0]);
        assert!((a.cosine_similarity(&b) - 1.0).abs() < 1e-6);

        let c = HybridVector::new(SparseVector::from_pairs(vec![(1, 1.0)]), 2, vec![0.0]);
        assert!(a.cosine_similarity(&c).abs() < 1e-6);

        let zero = HybridVector::new(SparseVector::default(), 2, vec![0.0]);
        assert_eq!(a.cosine_similarity(&zero), 0.0);
    }

    #[test]
    fn test_hybrid_layout_and_dense() {
        let v = HybridVector::new(SparseVector::from_pairs(vec![(1, 0.5)]), 3, vec![0.25, 1.0]);
        assert_eq!(v.dim(), 5);
        assert_eq!(v.to_dense(), vec![0.0, 0.5, 0.0, 0.25, 1.0]);

        let n = v.normalized();
        assert!((n.norm() - 1.0).abs() < 1e-6);
    }
}
