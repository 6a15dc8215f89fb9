pub mod compare;
pub mod term;
pub mod tfidf;
pub mod vocabulary;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::tokenizer::TokenSequence;
use crate::utils::math::vector::SpVec;
use crate::vectorizer::tfidf::{DefaultTFIDFEngine, IdfVariant, PlainTFIDFEngine, TFIDFEngine};
use crate::vectorizer::vocabulary::Vocabulary;

/// Sparse, L2-normalized TF-IDF weights of one document.
/// Its dimension is the vocabulary size; the norm is 1 unless every weight is 0.
pub type WeightVector = SpVec<f64>;

/// Vectorize with the default smoothed-idf engine
pub fn vectorize(tokens: &TokenSequence, vocab: &Vocabulary) -> Result<WeightVector> {
    vectorize_with::<DefaultTFIDFEngine>(tokens, vocab)
}

/// Vectorize with the engine selected by `variant`
pub fn vectorize_variant(
    tokens: &TokenSequence,
    vocab: &Vocabulary,
    variant: IdfVariant,
) -> Result<WeightVector> {
    match variant {
        IdfVariant::Smooth => vectorize_with::<DefaultTFIDFEngine>(tokens, vocab),
        IdfVariant::Plain => vectorize_with::<PlainTFIDFEngine>(tokens, vocab),
    }
}

/// Turn a token sequence into a unit-length TF-IDF vector over `vocab`.
///
/// # Errors
/// * `Error::EmptyDocument` if `tokens` is empty
/// * `Error::Vectorization` if `vocab` has no terms
pub fn vectorize_with<E>(tokens: &TokenSequence, vocab: &Vocabulary) -> Result<WeightVector>
where
    E: TFIDFEngine,
{
    if tokens.is_empty() {
        return Err(Error::EmptyDocument { label: None });
    }
    if vocab.is_empty() {
        return Err(Error::Vectorization(
            "vocabulary has no terms, nothing to weight".to_string(),
        ));
    }

    let freq = tokens.term_frequency();
    let mut weights = E::tf_idf_vec(&freq, vocab);
    let unknown = freq.unique_term_count() - weights.nnz();
    let norm = weights.normalize();
    if norm == 0.0 {
        warn!(tokens = tokens.len(), "document has no vocabulary terms, using zero vector");
    }
    debug!(
        tokens = tokens.len(),
        nnz = weights.nnz(),
        unknown,
        dim = weights.len(),
        norm,
        "vectorized document"
    );
    Ok(weights)
}
