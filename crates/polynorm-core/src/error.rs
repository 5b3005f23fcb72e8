//! Error types for the polynorm core
//!
//! All fallible operations return `Result<T, Error>`.
//! Degenerate geometry (coincident points, zero radius) is never an error.

use thiserror::Error;

/// Polynorm error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Empty required field, non-finite coordinate, or mismatched buffers
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Document is not valid JSON or has no recognizable line shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Normalization settings out of range
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

/// Result type alias for polynorm operations
pub type Result<T> = std::result::Result<T, Error>;
