use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vectorizer::WeightVector;

/// Similarity of two documents, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityScore(f64);

impl SimilarityScore {
    pub const ZERO: SimilarityScore = SimilarityScore(0.0);
    pub const ONE: SimilarityScore = SimilarityScore(1.0);

    /// Clamp `raw` into `[0, 1]`. NaN maps to 0.
    #[inline]
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::ZERO;
        }
        Self(raw.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<SimilarityScore> for f64 {
    fn from(score: SimilarityScore) -> Self {
        score.0
    }
}

/// Always prints a decimal point, `1.0` rather than `1`
impl fmt::Display for SimilarityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Cosine similarity of two weight vectors built over the same vocabulary.
/// cos(θ) = Σ(a_i * b_i) / sqrt(||a||² * ||b||²)
///
/// For unit vectors this is just the dot product. The norms are still
/// divided out so hand-built vectors score correctly. A zero vector on
/// either side scores 0, and floating point drift outside `[0, 1]` is clamped.
/// Identical vectors score exactly 1.
pub fn score(v1: &WeightVector, v2: &WeightVector) -> SimilarityScore {
    debug_assert_eq!(v1.len(), v2.len(), "vectors must share a vocabulary");
    if v1.is_zero_vec() || v2.is_zero_vec() {
        return SimilarityScore::ZERO;
    }
    // sqrt(x * x) == x in IEEE arithmetic, so v.dot(&v) / sqrt(n * n) is 1
    let denom = (v1.norm_sq() * v2.norm_sq()).sqrt();
    if denom == 0.0 {
        return SimilarityScore::ZERO;
    }
    SimilarityScore::new(v1.dot(v2) / denom)
}
