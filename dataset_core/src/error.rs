use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a dataset preparation run.
///
/// Per-line problems never surface here; they are counted in
/// [`crate::report::PrepareReport`] instead.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Not found: texts.txt under {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PrepareResult<T> = Result<T, PrepareError>;
