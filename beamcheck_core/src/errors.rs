//! # Error Types
//!
//! Structured error types for beamcheck_core. Only a handful of conditions are
//! hard errors: a model that cannot be opened, invalid settings, and export
//! failures. A beam whose cross-section cannot be resolved is *not* an error;
//! it is reported as an `UNKNOWN` row (see [`crate::report`]).
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::errors::{CheckError, CheckResult};
//!
//! fn validate_cover(cover_mm: f64) -> CheckResult<()> {
//!     if cover_mm <= 0.0 {
//!         return Err(CheckError::invalid_input(
//!             "nominal_cover_mm",
//!             cover_mm.to_string(),
//!             "Cover must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for beamcheck_core operations
pub type CheckResult<T> = Result<T, CheckError>;

/// Structured error type for beam check operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CheckError {
    /// The building model could not be opened or parsed. Fatal for a run.
    #[error("Model unreadable: '{path}' - {reason}")]
    ModelUnreadable { path: String, reason: String },

    /// A settings value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Configuration file could not be found or parsed
    #[error("Configuration error: '{path}' - {reason}")]
    ConfigError { path: String, reason: String },

    /// File I/O error while writing a report
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CheckError {
    /// Create a ModelUnreadable error
    pub fn model_unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CheckError::ModelUnreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CheckError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CheckError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CheckError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stops a run before any beam is processed
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            CheckError::ModelUnreadable { .. }
                | CheckError::InvalidInput { .. }
                | CheckError::ConfigError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CheckError::ModelUnreadable { .. } => "MODEL_UNREADABLE",
            CheckError::InvalidInput { .. } => "INVALID_INPUT",
            CheckError::ConfigError { .. } => "CONFIG_ERROR",
            CheckError::FileError { .. } => "FILE_ERROR",
            CheckError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}
