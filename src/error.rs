use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tokenizer::segmenter::SegmentError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read `{}`: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("text preprocessing failed: {0}")]
    Preprocessing(#[from] SegmentError),

    #[error("document{} is empty after normalization", label_suffix(.label))]
    EmptyDocument { label: Option<String> },

    #[error("vectorization failed: {0}")]
    Vectorization(String),

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_cbor::Error),
}

impl Error {
    pub(crate) fn empty_document(label: impl Into<String>) -> Self {
        Error::EmptyDocument { label: Some(label.into()) }
    }

    /// Attach a document label to an `EmptyDocument` error that has none.
    pub(crate) fn with_label(self, label: &str) -> Self {
        match self {
            Error::EmptyDocument { label: None } => Error::empty_document(label),
            other => other,
        }
    }
}

fn label_suffix(label: &Option<String>) -> String {
    match label {
        Some(label) => format!(" `{label}`"),
        None => String::new(),
    }
}
