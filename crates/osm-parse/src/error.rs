//! Parse-subsystem error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by `osm-parse`.
///
/// Malformed XML is deliberately absent: it is counted in
/// [`crate::ParseReport`] and never raised.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ParseResult<T> = Result<T, ParseError>;
