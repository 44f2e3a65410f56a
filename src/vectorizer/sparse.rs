//! Sparse feature vectors.

use serde::{Deserialize, Serialize};

/// A sparse vector of TF-IDF weights.
///
/// Entries are `(term index, weight)` pairs sorted by index with no
/// duplicates and no explicit zeros. `dim` is the vocabulary size the vector
/// was produced against; a classifier uses it to detect mismatched inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// The zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build a vector from `(index, weight)` pairs.
    ///
    /// Pairs are sorted by index, zero weights are dropped and indices at or
    /// beyond `dim` are ignored. Duplicate indices are summed.
    pub fn from_pairs<I>(dim: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut entries: Vec<(usize, f64)> =
            pairs.into_iter().filter(|&(index, _)| index < dim).collect();
        entries.sort_by_key(|&(index, _)| index);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, weight) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == index => last.1 += weight,
                _ => merged.push((index, weight)),
            }
        }
        merged.retain(|&(_, weight)| weight != 0.0);

        Self {
            dim,
            entries: merged,
        }
    }

    /// Dimension (vocabulary size) of the vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every coordinate is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the non-zero `(index, weight)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Weight at `index`, zero when absent.
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, w)| w * w)
            .sum::<f64>()
            .sqrt()
    }

    /// Scale to unit Euclidean norm. The zero vector is left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for entry in &mut self.entries {
                entry.1 /= norm;
            }
        }
    }

    /// Dot product with a dense vector of the same dimension.
    ///
    /// Callers check dimensions first; indices past `dense.len()` count as zero.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|&(index, weight)| dense.get(index).map(|w| w * weight))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_merges_and_drops_zeros() {
        let vector = FeatureVector::from_pairs(5, vec![(3, 1.0), (0, 2.0), (3, 0.5), (1, 0.0)]);
        assert_eq!(vector.iter().collect::<Vec<_>>(), vec![(0, 2.0), (3, 1.5)]);
        assert_eq!(vector.nnz(), 2);
        assert_eq!(vector.get(3), 1.5);
        assert_eq!(vector.get(2), 0.0);
    }

    #[test]
    fn test_out_of_range_indices_are_ignored() {
        let vector = FeatureVector::from_pairs(2, vec![(1, 1.0), (7, 3.0)]);
        assert_eq!(vector.nnz(), 1);
    }

    #[test]
    fn test_normalize() {
        let mut vector = FeatureVector::from_pairs(3, vec![(0, 3.0), (2, 4.0)]);
        vector.normalize();
        assert!((vector.norm() - 1.0).abs() < 1e-12);
        assert!((vector.get(0) - 0.6).abs() < 1e-12);

        let mut zero = FeatureVector::zeros(3);
        zero.normalize();
        assert!(zero.is_zero());
    }

    #[test]
    fn test_dot() {
        let vector = FeatureVector::from_pairs(3, vec![(0, 1.0), (2, 2.0)]);
        assert_eq!(vector.dot(&[0.5, 10.0, 0.25]), 1.0);
    }
}
