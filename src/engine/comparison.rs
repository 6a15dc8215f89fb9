use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vectorizer::compare::SimilarityScore;
use crate::vectorizer::vocabulary::Vocabulary;
use crate::vectorizer::WeightVector;

/// Result of comparing two documents, with the vocabulary and vectors it was
/// computed from.
///
/// # Serialization
/// Supported. `to_cbor` / `from_cbor` give a compact snapshot that can be
/// archived and later checked against a fresh run on the same inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    labels: [String; 2],
    vocabulary: Vocabulary,
    vectors: [WeightVector; 2],
    score: SimilarityScore,
}

impl Comparison {
    pub(crate) fn new(
        labels: [String; 2],
        vocabulary: Vocabulary,
        vectors: [WeightVector; 2],
        score: SimilarityScore,
    ) -> Self {
        Self {
            labels,
            vocabulary,
            vectors,
            score,
        }
    }

    #[inline]
    pub fn score(&self) -> SimilarityScore {
        self.score
    }

    #[inline]
    pub fn labels(&self) -> [&str; 2] {
        [self.labels[0].as_str(), self.labels[1].as_str()]
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn vectors(&self) -> &[WeightVector; 2] {
        &self.vectors
    }

    /// `<first> vs <second> similarity: <score>`
    pub fn report_line(&self) -> String {
        format!("{} vs {} similarity: {}", self.labels[0], self.labels[1], self.score)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    pub fn write_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_cbor()?).map_err(|source| Error::FileAccess {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| Error::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_cbor(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::engine::SimilarityEngine;
    use crate::tokenizer::segmenter::WhitespaceSegmenter;
    use crate::tokenizer::Tokenizer;

    fn comparison() -> Comparison {
        let engine = SimilarityEngine::new(Tokenizer::new(Box::new(WhitespaceSegmenter)));
        let a = Document::new("orig.txt", "the quick brown fox");
        let b = Document::new("copy.txt", "the quick red fox");
        engine.compare(&a, &b).unwrap()
    }

    #[test]
    fn report_line_format() {
        let cmp = comparison();
        let line = cmp.report_line();
        assert!(line.starts_with("orig.txt vs copy.txt similarity: 0."), "{line}");
    }

    #[test]
    fn snapshot_restores_identical_comparison() {
        let cmp = comparison();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmp.cbor");
        cmp.write_snapshot(&path).unwrap();
        let restored = Comparison::read_snapshot(&path).unwrap();
        assert_eq!(restored, cmp);
        assert_eq!(restored.score().value().to_bits(), cmp.score().value().to_bits());
    }

    #[test]
    fn garbage_snapshot_is_rejected() {
        let err = Comparison::from_cbor(&[0xff, 0x00, 0x13]).unwrap_err();
        assert!(matches!(err, Error::Snapshot(_)));
    }
}
