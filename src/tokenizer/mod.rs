pub mod segmenter;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::vectorizer::term::TermFrequency;

use self::segmenter::Segmenter;

/// Ordered sequence of normalized word tokens taken from one document.
/// May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSequence {
    tokens: Vec<String>,
}

impl TokenSequence {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(String::as_str)
    }

    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// Count the occurrences of every token
    pub fn term_frequency(&self) -> TermFrequency {
        let mut freq = TermFrequency::new();
        freq.add_terms(&self.tokens);
        freq
    }
}

impl FromIterator<String> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(str::to_owned).collect())
    }
}

/// Remove every character that is neither alphanumeric nor whitespace.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Normalizes raw text and segments it into a `TokenSequence`.
///
/// Steps:
/// 1. strip punctuation and symbols
/// 2. segment with the configured `Segmenter`
/// 3. drop whitespace-only pieces, case-fold, drop tokens shorter than `min_token_chars`
pub struct Tokenizer {
    segmenter: Box<dyn Segmenter>,
    lowercase: bool,
    min_token_chars: usize,
}

impl Tokenizer {
    pub fn new(segmenter: Box<dyn Segmenter>) -> Self {
        Self {
            segmenter,
            lowercase: true,
            min_token_chars: 1,
        }
    }

    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn min_token_chars(mut self, min_token_chars: usize) -> Self {
        self.min_token_chars = min_token_chars;
        self
    }

    pub fn segmenter(&self) -> &dyn Segmenter {
        self.segmenter.as_ref()
    }

    /// Tokenize `text`.
    /// Empty input yields an empty sequence; segmenter failures become `Error::Preprocessing`.
    pub fn tokenize(&self, text: &str) -> Result<TokenSequence> {
        let stripped = strip_punctuation(text);
        if stripped.trim().is_empty() {
            return Ok(TokenSequence::default());
        }
        let pieces = self.segmenter.segment(&stripped)?;
        let piece_num = pieces.len();
        let tokens: TokenSequence = pieces
            .into_iter()
            .filter_map(|piece| {
                let piece = piece.trim();
                if piece.is_empty() {
                    return None;
                }
                let token = if self.lowercase {
                    piece.to_lowercase()
                } else {
                    piece.to_owned()
                };
                (token.chars().count() >= self.min_token_chars).then_some(token)
            })
            .collect();
        debug!(
            segmenter = self.segmenter.name(),
            pieces = piece_num,
            tokens = tokens.len(),
            "tokenized text"
        );
        Ok(tokens)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        #[cfg(feature = "jieba")]
        let segmenter: Box<dyn Segmenter> = Box::new(segmenter::JiebaSegmenter::default());
        #[cfg(not(feature = "jieba"))]
        let segmenter: Box<dyn Segmenter> = Box::new(segmenter::UnicodeWordSegmenter);
        Self::new(segmenter)
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("segmenter", &self.segmenter.name())
            .field("lowercase", &self.lowercase)
            .field("min_token_chars", &self.min_token_chars)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::segmenter::{SegmentError, UnicodeWordSegmenter, WhitespaceSegmenter};
    use super::*;
    use crate::Error;

    fn whitespace() -> Tokenizer {
        Tokenizer::new(Box::new(WhitespaceSegmenter))
    }

    struct FailingSegmenter;

    impl Segmenter for FailingSegmenter {
        fn segment(&self, _text: &str) -> std::result::Result<Vec<String>, SegmentError> {
            Err(SegmentError::Other("dictionary corrupted".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn strips_punctuation_and_symbols() {
        assert_eq!(strip_punctuation("the cat, sat! (on) $mat$."), "the cat sat on mat");
        assert_eq!(strip_punctuation("测试文本，应该去除标点。"), "测试文本应该去除标点");
    }

    #[test]
    fn tokenizes_and_lowercases() {
        let tokens = whitespace().tokenize("The Cat sat. THE cat!").unwrap();
        assert_eq!(tokens.as_slice(), ["the", "cat", "sat", "the", "cat"]);
    }

    #[test]
    fn lowercase_can_be_disabled() {
        let tokens = whitespace().lowercase(false).tokenize("Rust rust").unwrap();
        assert_eq!(tokens.as_slice(), ["Rust", "rust"]);
    }

    #[test]
    fn short_tokens_are_dropped_when_configured() {
        let tokens = whitespace().min_token_chars(2).tokenize("a cat is on a mat").unwrap();
        assert_eq!(tokens.as_slice(), ["cat", "is", "on", "mat"]);
    }

    #[test]
    fn empty_and_punctuation_only_input_give_empty_sequence() {
        assert!(whitespace().tokenize("").unwrap().is_empty());
        assert!(whitespace().tokenize("  ...!?  ").unwrap().is_empty());
    }

    #[test]
    fn empty_input_does_not_reach_the_segmenter() {
        let tokenizer = Tokenizer::new(Box::new(FailingSegmenter));
        assert!(tokenizer.tokenize("").unwrap().is_empty());
    }

    #[test]
    fn segmenter_failure_becomes_preprocessing_error() {
        let tokenizer = Tokenizer::new(Box::new(FailingSegmenter));
        let err = tokenizer.tokenize("some text").unwrap_err();
        assert!(matches!(err, Error::Preprocessing(SegmentError::Other(_))));
        assert!(err.to_string().contains("dictionary corrupted"));
    }

    #[test]
    fn unicode_segmenter_keeps_numbers() {
        let tokenizer = Tokenizer::new(Box::new(UnicodeWordSegmenter));
        let tokens = tokenizer.tokenize("Version 2, released in 2024.").unwrap();
        assert_eq!(tokens.as_slice(), ["version", "2", "released", "in", "2024"]);
    }

    #[cfg(feature = "jieba")]
    #[test]
    fn default_tokenizer_segments_chinese() {
        let tokens = Tokenizer::default().tokenize("我来到北京清华大学。").unwrap();
        assert!(tokens.iter().any(|t| t == "北京"));
        assert!(tokens.iter().all(|t| !t.trim().is_empty()));
    }

    #[test]
    fn term_frequency_counts_repeats() {
        let tokens: TokenSequence = ["cat", "dog", "cat"].into_iter().collect();
        let freq = tokens.term_frequency();
        assert_eq!(freq.term_count("cat"), 2);
        assert_eq!(freq.term_count("dog"), 1);
        assert_eq!(freq.term_sum(), 3);
    }
}
