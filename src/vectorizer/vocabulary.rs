use std::collections::{BTreeMap, HashSet};

use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::tokenizer::TokenSequence;

/// Term → index mapping built jointly over the documents under comparison.
///
/// Indices follow the lexicographic order of the terms, so the same set of
/// documents always produces the same vocabulary regardless of the order
/// in which the terms were first seen. For every term the vocabulary also
/// keeps its document frequency: the number of input documents that contain
/// the term at least once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// term → document frequency, in index order
    #[serde(with = "indexmap::map::serde_seq")]
    term_doc_freq: IndexMap<Box<str>, u64>,
    /// number of documents the vocabulary was built from
    doc_num: u64,
}

impl Vocabulary {
    /// Build the vocabulary of a document set.
    ///
    /// # Arguments
    /// * `sequences` - one token sequence per document
    pub fn build<'a, I>(sequences: I) -> Self
    where
        I: IntoIterator<Item = &'a TokenSequence>,
    {
        let mut doc_freq: BTreeMap<&'a str, u64> = BTreeMap::new();
        let mut doc_num = 0_u64;
        for seq in sequences {
            doc_num += 1;
            // a term counts once per document
            let distinct: HashSet<&str, RandomState> = seq.iter().collect();
            for term in distinct {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let term_doc_freq = doc_freq
            .into_iter()
            .map(|(term, df)| (Box::<str>::from(term), df))
            .collect();
        Self { term_doc_freq, doc_num }
    }

    /// Number of distinct terms (the vector dimension)
    #[inline]
    pub fn len(&self) -> usize {
        self.term_doc_freq.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_doc_freq.is_empty()
    }

    /// Number of documents used to build the vocabulary
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.term_doc_freq.get_index_of(term)
    }

    /// Document frequency of `term`, 0 if unknown
    #[inline]
    pub fn doc_freq(&self, term: &str) -> u64 {
        self.term_doc_freq.get(term).copied().unwrap_or(0)
    }

    #[inline]
    pub fn term_at(&self, index: usize) -> Option<&str> {
        self.term_doc_freq.get_index(index).map(|(term, _)| term.as_ref())
    }

    /// Iterate `(index, term, document frequency)` in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, u64)> + '_ {
        self.term_doc_freq
            .iter()
            .enumerate()
            .map(|(idx, (term, &df))| (idx, term.as_ref(), df))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(text: &str) -> TokenSequence {
        text.split_whitespace().collect()
    }

    #[test]
    fn indices_follow_lexicographic_order() {
        let a = seq("pear apple fig");
        let b = seq("banana apple");
        let vocab = Vocabulary::build([&a, &b]);

        let terms: Vec<&str> = vocab.iter().map(|(_, term, _)| term).collect();
        assert_eq!(terms, vec!["apple", "banana", "fig", "pear"]);
        assert_eq!(vocab.index_of("apple"), Some(0));
        assert_eq!(vocab.index_of("pear"), Some(3));
        assert_eq!(vocab.index_of("kiwi"), None);
        assert_eq!(vocab.term_at(1), Some("banana"));
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.doc_num(), 2);
    }

    #[test]
    fn document_order_does_not_change_the_vocabulary() {
        let a = seq("the quick brown fox");
        let b = seq("the lazy dog");
        assert_eq!(Vocabulary::build([&a, &b]), Vocabulary::build([&b, &a]));
    }

    #[test]
    fn repeated_terms_count_once_per_document() {
        let a = seq("cat cat cat dog");
        let b = seq("cat bird");
        let vocab = Vocabulary::build([&a, &b]);
        assert_eq!(vocab.doc_freq("cat"), 2);
        assert_eq!(vocab.doc_freq("dog"), 1);
        assert_eq!(vocab.doc_freq("bird"), 1);
        assert_eq!(vocab.doc_freq("fish"), 0);
    }

    #[test]
    fn empty_sequences_give_empty_vocabulary() {
        let empty = TokenSequence::default();
        let vocab = Vocabulary::build([&empty, &empty]);
        assert!(vocab.is_empty());
        assert_eq!(vocab.doc_num(), 2);
    }
}
