use std::path::PathBuf;

use thiserror::Error;

/// Fatal inference errors. Nothing here is retried.
#[derive(Debug, Error)]
pub enum InferError {
    #[error("Not found: {what} at {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] candle_core::Error),

    #[error(
        "Weight restore failed: missing [{}], unexpected [{}], mismatched [{}]",
        missing.join(", "),
        unexpected.join(", "),
        mismatched.join(", ")
    )]
    WeightRestore {
        missing: Vec<String>,
        unexpected: Vec<String>,
        mismatched: Vec<String>,
    },

    #[error("Synthesis error: {0}")]
    Synthesis(#[from] anyhow::Error),

    #[error("Output error: {0}")]
    Output(anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InferError {
    pub fn not_found(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what,
            path: path.into(),
        }
    }
}

pub type InferResult<T> = Result<T, InferError>;
