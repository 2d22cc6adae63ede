//! Error types for the disaster-response pipeline.
//!
//! Every stage (ingestion, cleaning, persistence, training and serving)
//! reports failures through [`DisasterError`]. There is no local recovery:
//! errors propagate with `?` up to the binary, which prints them and exits.
//!
//! # Examples
//!
//! ```
//! use disaster_response::error::{DisasterError, Result};
//!
//! fn check_columns(found: usize) -> Result<()> {
//!     if found != 36 {
//!         return Err(DisasterError::schema(format!("expected 36 labels, got {found}")));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_columns(35).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for disaster-response operations.
#[derive(Error, Debug)]
pub enum DisasterError {
    /// I/O errors (file operations, sockets, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing errors from the input files
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Relational store errors
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Model artifact encoding/decoding errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input files do not line up or miss required columns
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Category schema violations found while cleaning or loading a table
    #[error("Schema error: {0}")]
    Schema(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Training, evaluation or prediction errors
    #[error("Model error: {0}")]
    Model(String),

    /// Invalid argument passed to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for operations that may fail with DisasterError.
pub type Result<T> = std::result::Result<T, DisasterError>;

impl DisasterError {
    /// Create a new ingest error.
    pub fn ingest<S: Into<String>>(msg: S) -> Self {
        DisasterError::Ingest(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        DisasterError::Schema(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        DisasterError::Analysis(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        DisasterError::Model(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        DisasterError::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = DisasterError::schema("row 3 has 35 categories");
        assert_eq!(error.to_string(), "Schema error: row 3 has 35 categories");

        let error = DisasterError::ingest("row count mismatch");
        assert_eq!(error.to_string(), "Ingest error: row count mismatch");

        let error = DisasterError::model("no training rows");
        assert_eq!(error.to_string(), "Model error: no training rows");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = DisasterError::from(io_error);

        match error {
            DisasterError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
