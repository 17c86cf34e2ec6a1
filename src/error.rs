//! Error types for the cafe-etl library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the pipeline.

use thiserror::Error;

/// Errors that can occur in the cafe-etl pipeline.
#[derive(Error, Debug)]
pub enum EtlError {
    /// The raw text could not be tokenized as delimited input
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A row's timestamp does not match the expected source format
    #[error("Row {row}: invalid timestamp '{value}', expected DD/MM/YYYY HH:MM")]
    TimestampFormat { row: usize, value: String },

    /// A numeric field could not be coerced to a number
    #[error("Row {row}: invalid numeric value '{value}' for field '{field}'")]
    NumericCoercion {
        row: usize,
        field: String,
        value: String,
    },

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with EtlError
pub type Result<T> = std::result::Result<T, EtlError>;

impl From<csv::Error> for EtlError {
    fn from(err: csv::Error) -> Self {
        EtlError::MalformedInput(err.to_string())
    }
}

impl From<anyhow::Error> for EtlError {
    fn from(err: anyhow::Error) -> Self {
        EtlError::Other(err.to_string())
    }
}
