use std::cmp::Ordering;

use num::{Float, Num};

use super::SpVec;

impl<N> SpVec<N>
where
    N: Num + Copy,
{
    /// Dot product
    /// d(a, b) = Σ(a_i * b_i)
    /// Only indices stored in both vectors contribute.
    ///
    /// # Arguments
    /// * `other` - vector of the same dimension
    #[inline]
    pub fn dot(&self, other: &Self) -> N {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );

        let mut result = N::zero();
        let mut a_it = self.raw_iter();
        let mut b_it = other.raw_iter();
        let mut a_next = a_it.next();
        let mut b_next = b_it.next();
        while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
            match ia.cmp(&ib) {
                Ordering::Equal => {
                    result = result + va * vb;
                    a_next = a_it.next();
                    b_next = b_it.next();
                }
                Ordering::Less => a_next = a_it.next(),
                Ordering::Greater => b_next = b_it.next(),
            }
        }
        result
    }

    /// Σ(a_i^2)
    /// Sums in the same order as `dot`, so `v.dot(&v) == v.norm_sq()` exactly.
    #[inline]
    pub fn norm_sq(&self) -> N {
        self.vals.iter().fold(N::zero(), |acc, &val| acc + val * val)
    }
}

impl<N> SpVec<N>
where
    N: Float,
{
    /// Euclidean norm
    #[inline]
    pub fn norm(&self) -> N {
        self.norm_sq().sqrt()
    }

    /// Divide every element by the euclidean norm.
    /// Returns the norm before scaling; a zero vector is left untouched.
    pub fn normalize(&mut self) -> N {
        let norm = self.norm();
        if norm > N::zero() {
            for val in self.vals.iter_mut() {
                *val = *val / norm;
            }
        }
        norm
    }
}
