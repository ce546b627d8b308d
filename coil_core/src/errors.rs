//! # Error Types
//!
//! Two layers of errors live here:
//!
//! - [`CalcError`] covers the request boundary and catalog I/O: bad request
//!   values, unknown materials, file and lock failures, corrupted JSON.
//! - [`CoilError`] is the per-material outcome of the coil engine. It is never
//!   raised; it travels as data inside [`crate::calculations::CoilOutcome`]
//!   so one unusable material cannot stop a catalog scan.
//!
//! ## Example
//!
//! ```rust
//! use coil_core::errors::{CalcError, CalcResult};
//!
//! fn validate_sweep(sweep: f64) -> CalcResult<()> {
//!     if sweep <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "sweep".to_string(),
//!             value: sweep.to_string(),
//!             reason: "Sweep must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for coil_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for boundary and I/O operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by scripts and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material not found in the catalog
    #[error("Material not found: {astm_type}")]
    MaterialNotFound { astm_type: String },

    /// The same ASTM type appears more than once in a batch
    #[error("Duplicate material: {astm_type}")]
    DuplicateMaterial { astm_type: String },

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
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(astm_type: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            astm_type: astm_type.into(),
        }
    }

    /// Create a DuplicateMaterial error
    pub fn duplicate_material(astm_type: impl Into<String>) -> Self {
        CalcError::DuplicateMaterial {
            astm_type: astm_type.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::DuplicateMaterial { .. } => "DUPLICATE_MATERIAL",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

/// Why the coil engine declined to size a coil for one material.
///
/// The display strings are the messages carried in the `error` field of a
/// failed [`crate::calculations::CoilOutcome`].
#[derive(Error, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum CoilError {
    /// Requested upper temperature is above the material's rating
    #[error("Max temp exceeds material limit ({limit_f}°F)")]
    TempExceedsMaterialLimit { limit_f: f64 },

    /// No flexivity band covers the requested interval
    #[error("No flexivity data for this temperature range.")]
    NoFlexivityData,
}

impl CoilError {
    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CoilError::TempExceedsMaterialLimit { .. } => "TEMP_EXCEEDS_MATERIAL_LIMIT",
            CoilError::NoFlexivityData => "NO_FLEXIVITY_DATA",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("sweep", "-5", "Sweep must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("t1").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::material_not_found("TM2").error_code(), "MATERIAL_NOT_FOUND");
        assert_eq!(CoilError::NoFlexivityData.error_code(), "NO_FLEXIVITY_DATA");
    }

    #[test]
    fn test_coil_error_messages() {
        let limit = CoilError::TempExceedsMaterialLimit { limit_f: 600.0 };
        assert_eq!(limit.to_string(), "Max temp exceeds material limit (600°F)");
        assert_eq!(
            CoilError::NoFlexivityData.to_string(),
            "No flexivity data for this temperature range."
        );
    }

    #[test]
    fn test_only_lock_errors_are_recoverable() {
        assert!(CalcError::file_locked("materials.json", "someone", "now").is_recoverable());
        assert!(!CalcError::serialization("bad").is_recoverable());
    }
}
