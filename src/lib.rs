//! This crate is a document similarity engine for duplicate and plagiarism
//! detection, built on TF-IDF weighting and cosine similarity.

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod tokenizer;
pub mod utils;
pub mod vectorizer;

/// Compute Similarity
/// The main entry point: scores two raw texts in `[0, 1]` using the default
/// engine (jieba segmentation when the `jieba` feature is on, smoothed idf).
///
/// Fails with `Error::EmptyDocument` when either text has no tokens left
/// after normalization.
pub use engine::compute_similarity;

/// Similarity Engine
/// Holds the tokenizer and idf convention and runs the pipeline
/// tokenize → vocabulary → vectorize → score for each comparison.
/// `pairwise` extends this to any number of documents over one shared
/// vocabulary.
pub use engine::SimilarityEngine;

/// Comparison result with its vocabulary and weight vectors.
///
/// # Serialization
/// Supported, including CBOR snapshots via `to_cbor` / `from_cbor`.
pub use engine::comparison::Comparison;

/// Pairwise scores of a document set
pub use engine::batch::SimilarityMatrix;

/// Tokenizer and its pluggable segmentation capability.
/// Segmenters provided: `WhitespaceSegmenter`, `UnicodeWordSegmenter`,
/// `CommandSegmenter`, and `JiebaSegmenter` with the `jieba` feature.
pub use tokenizer::{segmenter::Segmenter, TokenSequence, Tokenizer};

/// Vocabulary
/// Deterministic term → index mapping with per-term document frequency,
/// built fresh for each set of compared documents.
pub use vectorizer::vocabulary::Vocabulary;

/// TF-IDF Calculation Engine Trait
/// A default implementation, `DefaultTFIDFEngine`, uses the smoothed idf
/// `ln((1 + N) / (1 + df)) + 1`; `PlainTFIDFEngine` uses `ln(N / df) + 1`.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, IdfVariant, PlainTFIDFEngine, TFIDFEngine};

/// Weight vectors and scoring
pub use vectorizer::{compare::score, compare::SimilarityScore, vectorize, vectorize_with, WeightVector};

pub use config::SimilarityConfig;
pub use document::Document;
pub use error::{Error, Result};
