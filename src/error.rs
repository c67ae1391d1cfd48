/* ------------------------------------------------------------------ */
/* Error taxonomy shared by every stage of the pipeline               */
/* ------------------------------------------------------------------ */

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BigramError>;

#[derive(Debug, Error)]
pub enum BigramError {
    #[error("corpus has no entries to build a vocabulary from")]
    EmptyCorpus,

    #[error("character {0:?} is not in the vocabulary")]
    UnknownCharacter(char),

    #[error("code {code} is outside the vocabulary range [0, {size})")]
    OutOfRange { code: usize, size: usize },

    #[error("corpus entry {entry:?} contains the reserved boundary character {boundary:?}")]
    ReservedCharacter { entry: String, boundary: char },

    #[error("smoothing constant must be finite and >= 0, got {0}")]
    InvalidSmoothing(f32),

    #[error("transition {prev:?} -> {next:?} has zero probability")]
    ZeroProbability { prev: char, next: char },

    #[error("row {code} of the probability table has no probability mass")]
    EmptyRow { code: usize },

    #[error("generated sequence exceeded the maximum length of {max_len} characters")]
    GenerationOverflow { max_len: usize },

    #[error("{what}: expected size {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bad checkpoint {}: {reason}", path.display())]
    Checkpoint { path: PathBuf, reason: String },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BigramError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
