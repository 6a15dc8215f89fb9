pub mod batch;
pub mod comparison;

use tracing::{debug, debug_span};

use crate::config::SimilarityConfig;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::tokenizer::{TokenSequence, Tokenizer};
use crate::vectorizer::compare::{score, SimilarityScore};
use crate::vectorizer::tfidf::IdfVariant;
use crate::vectorizer::vectorize_variant;
use crate::vectorizer::vocabulary::Vocabulary;

use self::comparison::Comparison;

/// Similarity Engine
/// Runs the whole pipeline for a pair of documents:
/// tokenize each → build a joint vocabulary → vectorize each → score.
///
/// The engine only holds configuration. Every call builds its vocabulary and
/// vectors from scratch, so one engine can serve any number of independent
/// comparisons, also from several threads at once.
#[derive(Debug, Default)]
pub struct SimilarityEngine {
    tokenizer: Tokenizer,
    idf: IdfVariant,
}

impl SimilarityEngine {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            idf: IdfVariant::default(),
        }
    }

    pub fn with_idf(mut self, idf: IdfVariant) -> Self {
        self.idf = idf;
        self
    }

    pub fn from_config(config: &SimilarityConfig) -> Result<Self> {
        Ok(Self::new(config.build_tokenizer()?).with_idf(config.idf))
    }

    #[inline]
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    #[inline]
    pub fn idf(&self) -> IdfVariant {
        self.idf
    }

    /// Tokenize a document, rejecting it if nothing is left after normalization
    pub fn tokenize_document(&self, doc: &Document) -> Result<TokenSequence> {
        let tokens = self.tokenizer.tokenize(doc.text())?;
        if tokens.is_empty() {
            return Err(Error::empty_document(doc.label()));
        }
        Ok(tokens)
    }

    /// Compare two documents and keep every intermediate artifact
    pub fn compare(&self, a: &Document, b: &Document) -> Result<Comparison> {
        let span = debug_span!("compare", a = a.label(), b = b.label());
        let _enter = span.enter();

        let tokens_a = self.tokenize_document(a)?;
        let tokens_b = self.tokenize_document(b)?;

        let vocabulary = Vocabulary::build([&tokens_a, &tokens_b]);
        if vocabulary.is_empty() {
            return Err(Error::Vectorization(
                "documents share an empty vocabulary".to_string(),
            ));
        }
        debug!(terms = vocabulary.len(), "built vocabulary");

        let vec_a = vectorize_variant(&tokens_a, &vocabulary, self.idf)
            .map_err(|e| e.with_label(a.label()))?;
        let vec_b = vectorize_variant(&tokens_b, &vocabulary, self.idf)
            .map_err(|e| e.with_label(b.label()))?;
        let score = score(&vec_a, &vec_b);
        debug!(%score, "scored documents");

        Ok(Comparison::new(
            [a.label().to_string(), b.label().to_string()],
            vocabulary,
            [vec_a, vec_b],
            score,
        ))
    }

    /// Score two raw texts
    pub fn compare_texts(&self, text_a: &str, text_b: &str) -> Result<SimilarityScore> {
        let a = Document::new("text_a", text_a);
        let b = Document::new("text_b", text_b);
        Ok(self.compare(&a, &b)?.score())
    }
}

/// Similarity of two texts in `[0, 1]` with the default engine.
///
/// # Examples
/// ```
/// let score = tf_idf_similarity::compute_similarity("apple banana", "car truck").unwrap();
/// assert_eq!(score, 0.0);
/// ```
pub fn compute_similarity(text_a: &str, text_b: &str) -> Result<f64> {
    SimilarityEngine::default()
        .compare_texts(text_a, text_b)
        .map(f64::from)
}
