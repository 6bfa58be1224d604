//! Error types for osm-export.

use thiserror::Error;

/// Errors that can occur while rendering or writing output.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, ExportError>`.
pub type ExportResult<T> = Result<T, ExportError>;
