use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::document::Document;
use crate::engine::SimilarityEngine;
use crate::error::{Error, Result};
use crate::tokenizer::TokenSequence;
use crate::vectorizer::compare::{score, SimilarityScore};
use crate::vectorizer::vectorize_variant;
use crate::vectorizer::vocabulary::Vocabulary;
use crate::vectorizer::WeightVector;

/// Pairwise similarity of a document set, row-major `n * n`.
/// Symmetric with a diagonal of 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    labels: Vec<String>,
    scores: Vec<SimilarityScore>,
}

impl SimilarityMatrix {
    /// number of documents
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// # Panics
    /// if `i` or `j` is out of range
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> SimilarityScore {
        assert!(i < self.len() && j < self.len(), "index out of range");
        self.scores[i * self.len() + j]
    }

    /// Every unordered pair `(i, j, score)` with `i < j`
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, SimilarityScore)> + '_ {
        let n = self.len();
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j, self.get(i, j))))
    }

    /// Pairs sorted by descending score; ties keep index order
    pub fn ranked_pairs(&self) -> Vec<(usize, usize, SimilarityScore)> {
        let mut pairs: Vec<_> = self.pairs().collect();
        pairs.sort_by(|a, b| b.2.value().total_cmp(&a.2.value()));
        pairs
    }
}

impl SimilarityEngine {
    /// Compare every pair of `docs` over one shared vocabulary.
    ///
    /// Tokenization and vectorization run in parallel; building the
    /// vocabulary waits for every document to be tokenized.
    pub fn pairwise(&self, docs: &[Document]) -> Result<SimilarityMatrix> {
        if docs.len() < 2 {
            return Err(Error::Vectorization(format!(
                "pairwise comparison needs at least two documents, got {}",
                docs.len()
            )));
        }
        let span = debug_span!("pairwise", docs = docs.len());
        let _enter = span.enter();

        // errors are reported in document order, not completion order
        let tokens: Vec<TokenSequence> = docs
            .par_iter()
            .map(|doc| self.tokenize_document(doc))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<_>>()?;

        let vocabulary = Vocabulary::build(&tokens);
        if vocabulary.is_empty() {
            return Err(Error::Vectorization(
                "documents share an empty vocabulary".to_string(),
            ));
        }
        debug!(terms = vocabulary.len(), "built shared vocabulary");

        let vectors: Vec<WeightVector> = tokens
            .par_iter()
            .zip(docs.par_iter())
            .map(|(seq, doc)| {
                vectorize_variant(seq, &vocabulary, self.idf).map_err(|e| e.with_label(doc.label()))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<_>>()?;

        let n = docs.len();
        let scores: Vec<SimilarityScore> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                let vectors = &vectors;
                (0..n).map(move |j| {
                    if i == j {
                        SimilarityScore::ONE
                    } else {
                        score(&vectors[i], &vectors[j])
                    }
                })
            })
            .collect();

        Ok(SimilarityMatrix {
            labels: docs.iter().map(|doc| doc.label().to_string()).collect(),
            scores,
        })
    }
}
