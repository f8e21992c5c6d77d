//! Error types for the flatrecon library.
//!
//! Only malformed input is an error. Disagreements between a file and the
//! database are never raised; they are reported in a `ValidationResult`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for flatrecon operations.
#[derive(Debug, Error)]
pub enum ReconError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The flat file is structurally unusable.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter specified in a layout.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Layout definition is inconsistent.
    #[error("Layout error: {0}")]
    Layout(String),

    /// Input records have the wrong shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error saving or loading a validation result.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl ReconError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReconError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for flatrecon operations.
pub type Result<T> = std::result::Result<T, ReconError>;
