use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Word segmentation capability.
///
/// A segmenter turns punctuation-free text into word tokens. Implementations
/// may return whitespace-only pieces; the tokenizer discards them.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Result<Vec<String>, SegmentError>;

    /// short name used in logs
    fn name(&self) -> &str;
}

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("failed to run segmenter `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("segmenter `{program}` exited with status {code:?}: {stderr}")]
    Exit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Splits on unicode whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>, SegmentError> {
        Ok(text.split_whitespace().map(str::to_owned).collect())
    }

    fn name(&self) -> &str {
        "whitespace"
    }
}

/// UAX #29 word boundaries.
/// Han ideographs come out one character per word.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordSegmenter;

impl Segmenter for UnicodeWordSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>, SegmentError> {
        Ok(text.unicode_words().map(str::to_owned).collect())
    }

    fn name(&self) -> &str {
        "unicode"
    }
}

#[cfg(feature = "jieba")]
pub use self::jieba::JiebaSegmenter;

#[cfg(feature = "jieba")]
mod jieba {
    use std::sync::{Arc, OnceLock};

    use jieba_rs::Jieba;

    use super::{SegmentError, Segmenter};

    static DEFAULT_DICT: OnceLock<Arc<Jieba>> = OnceLock::new();

    /// Dictionary based segmenter for Chinese text (and mixed-script text).
    ///
    /// The bundled dictionary is loaded once per process and shared between
    /// instances; it is never mutated after loading.
    #[derive(Clone)]
    pub struct JiebaSegmenter {
        jieba: Arc<Jieba>,
        hmm: bool,
    }

    impl JiebaSegmenter {
        /// `hmm` enables the HMM model for words missing from the dictionary
        pub fn new(hmm: bool) -> Self {
            let jieba = DEFAULT_DICT.get_or_init(|| Arc::new(Jieba::new())).clone();
            Self { jieba, hmm }
        }
    }

    impl Default for JiebaSegmenter {
        fn default() -> Self {
            Self::new(true)
        }
    }

    impl std::fmt::Debug for JiebaSegmenter {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("JiebaSegmenter").field("hmm", &self.hmm).finish()
        }
    }

    impl Segmenter for JiebaSegmenter {
        fn segment(&self, text: &str) -> Result<Vec<String>, SegmentError> {
            Ok(self
                .jieba
                .cut(text, self.hmm)
                .into_iter()
                .map(str::to_owned)
                .collect())
        }

        fn name(&self) -> &str {
            "jieba"
        }
    }
}

/// Runs an external tokenizer program once per call.
///
/// The text is written to the program's stdin. Every whitespace separated
/// field of stdout is a token, except for `EOS` markers which morphological
/// analyzers print at the end of each sentence.
#[derive(Debug, Clone)]
pub struct CommandSegmenter {
    program: String,
    args: Vec<String>,
}

impl CommandSegmenter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn io_error(&self, source: io::Error) -> SegmentError {
        SegmentError::Io {
            program: self.program.clone(),
            source,
        }
    }
}

impl Segmenter for CommandSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>, SegmentError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.io_error(e))?;

        // stdin is fed from its own thread while stdout and stderr are
        // drained here; writing everything first deadlocks once the
        // program's output fills the pipe buffer.
        let stdin = child.stdin.take();
        let output = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => match stdin.write_all(text.as_bytes()) {
                    // a program that exits without reading closes the pipe early
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                },
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            written.and(output)
        })
        .map_err(|e| self.io_error(e))?;
        if !output.status.success() {
            return Err(SegmentError::Exit {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| SegmentError::Other(Box::new(e)))?;
        Ok(stdout
            .split_whitespace()
            .filter(|tok| *tok != "EOS")
            .map(str::to_owned)
            .collect())
    }

    fn name(&self) -> &str {
        &self.program
    }
}
