//! Error types shared across the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
///
/// These are the stable identifiers surfaced to API clients; the message text
/// next to them may change freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    OutOfRange,
    InvalidFormat,

    // Gateway errors
    UnsupportedFormat,
    IngestionFailed,
    ExplorationFailed,
    PredictionFailed,

    // Workflow errors
    IllegalTransition,
    PayloadMismatch,
    NothingRetained,
    StageUnavailable,
    RecordNotFound,
    StaleResponse,
    StageInFlight,

    // Infrastructure errors
    InternalError,
}

impl ErrorCode {
    /// Returns the wire representation of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorCode::IngestionFailed => "INGESTION_FAILED",
            ErrorCode::ExplorationFailed => "EXPLORATION_FAILED",
            ErrorCode::PredictionFailed => "PREDICTION_FAILED",
            ErrorCode::IllegalTransition => "ILLEGAL_TRANSITION",
            ErrorCode::PayloadMismatch => "PAYLOAD_MISMATCH",
            ErrorCode::NothingRetained => "NOTHING_RETAINED",
            ErrorCode::StageUnavailable => "STAGE_UNAVAILABLE",
            ErrorCode::RecordNotFound => "RECORD_NOT_FOUND",
            ErrorCode::StaleResponse => "STALE_RESPONSE",
            ErrorCode::StageInFlight => "STAGE_IN_FLIGHT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ValidationError {
    /// Returns the error code for this validation failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        }
    }
}
