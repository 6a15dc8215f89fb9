//! Engine configuration.
//!
//! Uses Figment to merge built-in defaults, an optional TOML file and
//! `TFIDF_SIM_*` environment variables, in that order.

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tokenizer::segmenter::{
    CommandSegmenter, Segmenter, UnicodeWordSegmenter, WhitespaceSegmenter,
};
use crate::tokenizer::Tokenizer;
use crate::vectorizer::tfidf::IdfVariant;

pub const ENV_PREFIX: &str = "TFIDF_SIM_";
pub const DEFAULT_CONFIG_FILE: &str = "similarity.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SegmenterKind {
    /// dictionary based, for Chinese and mixed text
    Jieba,
    /// unicode word boundaries
    Unicode,
    /// split on whitespace only
    Whitespace,
    /// external program, see `segmenter_command`
    Command,
}

impl Default for SegmenterKind {
    fn default() -> Self {
        if cfg!(feature = "jieba") {
            SegmenterKind::Jieba
        } else {
            SegmenterKind::Unicode
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub segmenter: SegmenterKind,
    /// program followed by its arguments, used by `SegmenterKind::Command`
    pub segmenter_command: Vec<String>,
    /// jieba HMM for out-of-dictionary words
    pub hmm: bool,
    pub lowercase: bool,
    pub min_token_chars: usize,
    pub idf: IdfVariant,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            segmenter: SegmenterKind::default(),
            segmenter_command: Vec::new(),
            hmm: true,
            lowercase: true,
            min_token_chars: 1,
            idf: IdfVariant::default(),
        }
    }
}

impl SimilarityConfig {
    /// Layered provider: defaults, then `path` (or `similarity.toml` when
    /// present in the working directory), then environment.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(SimilarityConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration. An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(Error::FileAccess {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "configuration file not found",
                    ),
                });
            }
        }
        let config: SimilarityConfig = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.segmenter == SegmenterKind::Command && self.segmenter_command.is_empty() {
            return Err(Error::InvalidConfig(
                "segmenter `command` needs a non-empty `segmenter_command`".to_string(),
            ));
        }
        if self.segmenter == SegmenterKind::Jieba && !cfg!(feature = "jieba") {
            return Err(Error::InvalidConfig(
                "segmenter `jieba` requires the `jieba` feature".to_string(),
            ));
        }
        Ok(())
    }

    /// Instantiate the configured segmenter
    pub fn build_segmenter(&self) -> Result<Box<dyn Segmenter>> {
        self.validate()?;
        let segmenter: Box<dyn Segmenter> = match self.segmenter {
            #[cfg(feature = "jieba")]
            SegmenterKind::Jieba => Box::new(crate::tokenizer::segmenter::JiebaSegmenter::new(self.hmm)),
            #[cfg(not(feature = "jieba"))]
            SegmenterKind::Jieba => {
                return Err(Error::InvalidConfig("jieba support is not compiled in".to_string()))
            }
            SegmenterKind::Unicode => Box::new(UnicodeWordSegmenter),
            SegmenterKind::Whitespace => Box::new(WhitespaceSegmenter),
            SegmenterKind::Command => {
                let (program, args) = self
                    .segmenter_command
                    .split_first()
                    .ok_or_else(|| Error::InvalidConfig("empty segmenter_command".to_string()))?;
                Box::new(CommandSegmenter::new(program.clone(), args.to_vec()))
            }
        };
        Ok(segmenter)
    }

    pub fn build_tokenizer(&self) -> Result<Tokenizer> {
        Ok(Tokenizer::new(self.build_segmenter()?)
            .lowercase(self.lowercase)
            .min_token_chars(self.min_token_chars))
    }
}
