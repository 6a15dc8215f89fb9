use serde::{Deserialize, Serialize};

use crate::vectorizer::{term::TermFrequency, vocabulary::Vocabulary};
use crate::utils::math::vector::SpVec;

/// TF-IDF weighting scheme.
///
/// Implement this trait to plug another weighting convention into
/// `vectorize_with`. Only `idf` is required; the other methods have the
/// textbook behaviour.
pub trait TFIDFEngine {
    /// Inverse document frequency of a term.
    /// # Arguments
    /// * `doc_num` - number of documents the vocabulary was built from
    /// * `doc_freq` - number of those documents containing the term
    fn idf(doc_num: u64, doc_freq: u64) -> f64;

    /// Term frequency weight from a raw count
    #[inline]
    fn tf(count: u64) -> f64 {
        count as f64
    }

    /// Raw (unnormalized) tf * idf weights of a document.
    /// Terms missing from the vocabulary are ignored.
    fn tf_idf_vec(freq: &TermFrequency, vocab: &Vocabulary) -> SpVec<f64> {
        let doc_num = vocab.doc_num();
        let pairs = freq
            .iter()
            .filter_map(|(term, count)| {
                let idx = vocab.index_of(term)?;
                let weight = Self::tf(count) * Self::idf(doc_num, vocab.doc_freq(term));
                Some((idx, weight))
            })
            .collect();
        SpVec::from_pairs(vocab.len(), pairs)
    }
}

/// Default engine: smoothed idf
/// idf(t) = ln((1 + N) / (1 + df(t))) + 1
///
/// Always positive, including for terms found in every document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }
}

/// Unsmoothed idf
/// idf(t) = ln(N / df(t)) + 1
///
/// A document frequency of 0 is treated as 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTFIDFEngine;

impl TFIDFEngine for PlainTFIDFEngine {
    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        let doc_freq = doc_freq.max(1) as f64;
        (doc_num.max(1) as f64 / doc_freq).ln() + 1.0
    }
}

/// Selects a `TFIDFEngine` at runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(clap::ValueEnum)]
pub enum IdfVariant {
    /// `DefaultTFIDFEngine`
    #[default]
    Smooth,
    /// `PlainTFIDFEngine`
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::TokenSequence;

    #[test]
    fn smooth_idf_values() {
        // term in both of two documents
        assert_eq!(DefaultTFIDFEngine::idf(2, 2), 1.0);
        // term in one of two documents
        let expected = (3.0_f64 / 2.0).ln() + 1.0;
        assert!((DefaultTFIDFEngine::idf(2, 1) - expected).abs() < 1e-15);
        assert!(DefaultTFIDFEngine::idf(2, 1) > DefaultTFIDFEngine::idf(2, 2));
    }

    #[test]
    fn plain_idf_values() {
        assert_eq!(PlainTFIDFEngine::idf(2, 2), 1.0);
        let expected = 2.0_f64.ln() + 1.0;
        assert!((PlainTFIDFEngine::idf(2, 1) - expected).abs() < 1e-15);
        assert!(PlainTFIDFEngine::idf(2, 0).is_finite());
    }

    #[test]
    fn raw_weights_multiply_count_and_idf() {
        let a: TokenSequence = ["x", "x", "y"].into_iter().collect();
        let b: TokenSequence = ["y"].into_iter().collect();
        let vocab = Vocabulary::build([&a, &b]);
        let raw = DefaultTFIDFEngine::tf_idf_vec(&a.term_frequency(), &vocab);
        let x = vocab.index_of("x").unwrap();
        let y = vocab.index_of("y").unwrap();
        assert!((raw.get(x) - 2.0 * DefaultTFIDFEngine::idf(2, 1)).abs() < 1e-12);
        assert_eq!(raw.get(y), 1.0);
    }
}
