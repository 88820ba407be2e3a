//! # Error Types
//!
//! Structured error types for stab_core. A roll-angle solve that finds no
//! equilibrium is not an error: it is reported as an unstable result in the
//! check artifact. Errors are reserved for invalid input and persistence
//! failures.
//!
//! ## Example
//!
//! ```rust
//! use stab_core::errors::{StabError, StabResult};
//!
//! fn validate_length(length_m: f64) -> StabResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(StabError::invalid_input(
//!             "girder_length",
//!             length_m.to_string(),
//!             "Girder length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(0.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for stab_core operations
pub type StabResult<T> = Result<T, StabError>;

/// Structured error type for stability operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum StabError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field or block is missing from a document
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A document could not be interpreted as a stability model
    #[error("Invalid file format: {reason}")]
    InvalidFileFormat { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// A document block is newer than this build understands
    #[error("Version mismatch in '{block}': file version {file_version}, supported up to {supported_version}")]
    VersionMismatch {
        block: String,
        file_version: u32,
        supported_version: u32,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl StabError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        StabError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        StabError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidFileFormat error
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        StabError::InvalidFileFormat {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        StabError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        StabError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StabError::FileLocked { .. })
    }

    /// Check if this error means the document itself is unusable
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            StabError::InvalidFileFormat { .. }
                | StabError::MissingField { .. }
                | StabError::SerializationError { .. }
                | StabError::VersionMismatch { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            StabError::InvalidInput { .. } => "INVALID_INPUT",
            StabError::MissingField { .. } => "MISSING_FIELD",
            StabError::InvalidFileFormat { .. } => "INVALID_FILE_FORMAT",
            StabError::FileError { .. } => "FILE_ERROR",
            StabError::FileLocked { .. } => "FILE_LOCKED",
            StabError::SerializationError { .. } => "SERIALIZATION_ERROR",
            StabError::VersionMismatch { .. } => "VERSION_MISMATCH",
            StabError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for StabError {
    fn from(e: serde_json::Error) -> Self {
        StabError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = StabError::invalid_input("fc", "-5.0", "Concrete strength must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: StabError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(StabError::missing_field("Girder").error_code(), "MISSING_FIELD");
        assert_eq!(StabError::invalid_format("bad").error_code(), "INVALID_FILE_FORMAT");
    }

    #[test]
    fn test_format_error_classification() {
        assert!(StabError::invalid_format("truncated").is_format_error());
        assert!(StabError::VersionMismatch {
            block: "Girder".into(),
            file_version: 9,
            supported_version: 2,
        }
        .is_format_error());
        assert!(!StabError::file_error("open", "x.pgs", "denied").is_format_error());
        assert!(StabError::file_locked("x.pgs", "someone", "now").is_recoverable());
    }
}
