pub mod math;

use num::Num;
use serde::{Deserialize, Serialize};

/// SpVec is a sparse vector that stores only its non-zero elements.
/// It keeps two parallel arrays:
/// - `inds` holds the element indices
/// - `vals` holds the element values
///
/// Elements are guaranteed to be sorted by ascending index, and every index
/// is smaller than `len`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpVec<N>
where
    N: Num + Copy,
{
    inds: Vec<u32>,
    vals: Vec<N>,
    len: usize,
}

impl<N> SpVec<N>
where
    N: Num + Copy,
{
    /// Create an all-zero vector of dimension `len`
    #[inline]
    pub fn new(len: usize) -> Self {
        Self {
            inds: Vec::new(),
            vals: Vec::new(),
            len,
        }
    }

    #[inline]
    pub fn with_capacity(len: usize, nnz: usize) -> Self {
        Self {
            inds: Vec::with_capacity(nnz),
            vals: Vec::with_capacity(nnz),
            len,
        }
    }

    /// Append an element after the current last one.
    /// Zero values are not stored.
    ///
    /// # Arguments
    /// * `index` - must be greater than every index already pushed and smaller than `len`
    /// * `value` - element value
    #[inline]
    pub fn raw_push(&mut self, index: usize, value: N) {
        debug_assert!(index < self.len, "index {index} out of range for dimension {}", self.len);
        debug_assert!(
            self.inds.last().map_or(true, |&last| (last as usize) < index),
            "indices must be pushed in ascending order"
        );
        if value.is_zero() {
            return;
        }
        self.inds.push(index as u32);
        self.vals.push(value);
    }

    /// Build from `(index, value)` pairs in any order.
    /// Duplicate indices are summed.
    pub fn from_pairs(len: usize, mut pairs: Vec<(usize, N)>) -> Self {
        pairs.sort_unstable_by_key(|&(idx, _)| idx);
        let mut vec = Self::with_capacity(len, pairs.len());
        let mut iter = pairs.into_iter().peekable();
        while let Some((idx, mut val)) = iter.next() {
            while let Some(&(next_idx, next_val)) = iter.peek() {
                if next_idx != idx {
                    break;
                }
                val = val + next_val;
                iter.next();
            }
            vec.raw_push(idx, val);
        }
        vec
    }

    /// dimension
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// number of stored (non-zero) elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// true when no element is stored
    #[inline]
    pub fn is_zero_vec(&self) -> bool {
        self.inds.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> N {
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    /// Iterate the stored `(index, value)` pairs in ascending index order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds
            .iter()
            .zip(self.vals.iter())
            .map(|(&idx, &val)| (idx as usize, val))
    }

    /// Dense copy of the vector
    pub fn to_dense(&self) -> Vec<N> {
        let mut dense = vec![N::zero(); self.len];
        for (idx, val) in self.raw_iter() {
            dense[idx] = val;
        }
        dense
    }
}

impl<N> From<Vec<N>> for SpVec<N>
where
    N: Num + Copy,
{
    fn from(dense: Vec<N>) -> Self {
        let mut vec = Self::new(dense.len());
        for (idx, val) in dense.into_iter().enumerate() {
            vec.raw_push(idx, val);
        }
        vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_are_not_stored() {
        let vec = SpVec::from(vec![0.0, 1.5, 0.0, 2.0]);
        assert_eq!(vec.len(), 4);
        assert_eq!(vec.nnz(), 2);
        assert_eq!(vec.get(1), 1.5);
        assert_eq!(vec.get(2), 0.0);
        assert_eq!(vec.to_dense(), vec![0.0, 1.5, 0.0, 2.0]);
    }

    #[test]
    fn from_pairs_sorts_and_merges() {
        let vec = SpVec::from_pairs(5, vec![(3, 1u32), (0, 2), (3, 4)]);
        let pairs: Vec<(usize, u32)> = vec.raw_iter().collect();
        assert_eq!(pairs, vec![(0, 2), (3, 5)]);
    }

    #[test]
    fn empty_vector_is_zero() {
        let vec: SpVec<f64> = SpVec::new(0);
        assert!(vec.is_empty());
        assert!(vec.is_zero_vec());
    }
}
