use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockSearchError {
    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid expression '{expression}' at offset {position}: {message}")]
    InvalidExpression {
        expression: String,
        position: usize,
        message: String,
    },

    #[error("predicate evaluation failed: {0}")]
    Evaluation(String),

    #[error("predicate timed out after {0} ms")]
    Timeout(u64),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("stream command '{command}' failed: {source}")]
    Stream {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl BlockSearchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BlockSearchError>;
