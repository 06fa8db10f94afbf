//! # Error Types
//!
//! Structured error types for camber_core. Every fallible operation in the
//! engine returns [`CalcResult`] so that front ends can decide how to surface
//! a failure (the CLI shows a short message; a GUI would pop a dialog).
//!
//! ## Example
//!
//! ```rust
//! use camber_core::errors::{CalcError, CalcResult};
//!
//! fn validate_speed(speed_kmh: f64) -> CalcResult<()> {
//!     if speed_kmh <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "speed_kmh",
//!             speed_kmh.to_string(),
//!             "Speed must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for camber_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation, storage and export operations.
///
/// Each variant carries enough context to explain the failure without the
/// caller having to re-derive it from the inputs.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (not a number, out of range, empty set)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A formula precondition is violated (zero denominator and friends)
    #[error("Domain error in {calculation}: {reason}")]
    Domain {
        calculation: String,
        reason: String,
    },

    /// A dependent calculation has not been run yet in this session
    #[error("Missing prerequisite for {calculation}: run '{required}' first")]
    MissingPrerequisite {
        calculation: String,
        required: String,
    },

    /// The calculation history store failed
    #[error("Storage error during {operation}: {reason}")]
    Storage { operation: String, reason: String },

    /// A stored row could not be parsed under the tagged value grammar
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// CSV/PDF export failed (unwritable path, render failure)
    #[error("Export error ({format}): {reason}")]
    Export { format: String, reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Domain error
    pub fn domain(calculation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Domain {
            calculation: calculation.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingPrerequisite error
    pub fn missing_prerequisite(
        calculation: impl Into<String>,
        required: impl Into<String>,
    ) -> Self {
        CalcError::MissingPrerequisite {
            calculation: calculation.into(),
            required: required.into(),
        }
    }

    /// Create a Storage error
    pub fn storage(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Storage {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a Serialization error
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::Serialization {
            reason: reason.into(),
        }
    }

    /// Create an Export error
    pub fn export(format: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Export {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::Domain { .. } => "DOMAIN_ERROR",
            CalcError::MissingPrerequisite { .. } => "MISSING_PREREQUISITE",
            CalcError::Storage { .. } => "STORAGE_ERROR",
            CalcError::Serialization { .. } => "SERIALIZATION_ERROR",
            CalcError::Export { .. } => "EXPORT_ERROR",
        }
    }

    /// True when the failure came from user-entered values rather than the
    /// environment (store, filesystem). Front ends use this to pick between
    /// a warning and an error presentation.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::Domain { .. }
                | CalcError::MissingPrerequisite { .. }
        )
    }
}

impl From<rusqlite::Error> for CalcError {
    fn from(e: rusqlite::Error) -> Self {
        CalcError::Storage {
            operation: "query".to_string(),
            reason: e.to_string(),
        }
    }
}
