//! Error types for the activity preprocessor
//!
//! The pipeline stages themselves never fail. Errors only arise at the
//! boundaries: decoding records, reading configuration and encoding output.

use thiserror::Error;

/// Errors that can occur while decoding, configuring or encoding an activity
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to parse records: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Value {value} out of range for field '{field}'")]
    OutOfRange { field: &'static str, value: String },

    #[error("Invalid position in record {index}: {reason}")]
    InvalidPosition { index: usize, reason: String },

    #[error("Timestamp of record {index} is earlier than the record before it")]
    UnorderedTimestamps { index: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
