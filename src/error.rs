//! Error types for rust_xpress

use thiserror::Error;

/// Main error type for expression normalization operations
#[derive(Error, Debug)]
pub enum XpressError {
    #[error("Parse error: {reason}")]
    Parse { reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Indeterminate normalization: sample '{sample_id}' has a library size of zero")]
    IndeterminateNormalization { sample_id: String },

    #[error("Unsupported format: '{path}' is not a tab-delimited (.txt or .tsv) file")]
    UnsupportedFormat { path: String },

    #[error("External process failed: `{command}` ({status})")]
    ExternalProcessFailed { command: String, status: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for rust_xpress operations
pub type Result<T> = std::result::Result<T, XpressError>;
