//! Error types for the prediction-time library

use thiserror::Error;

/// Errors returned to the caller of a prediction.
///
/// These are values, not panics: the hosting UI converts them into a
/// user-facing message and keeps running.
#[derive(Debug, Error)]
pub enum PredictError {
    /// A required field is missing or cannot be parsed as its expected type.
    #[error("field `{field}` is missing or malformed: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// A categorical value that was never seen during training.
    #[error("unknown value `{value}` for `{column}`")]
    UnknownCategory { column: String, value: String },
}

impl PredictError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while writing or loading the serialized model artifact.
///
/// Any of these is fatal at host startup: no prediction UI may be shown
/// until an artifact has loaded cleanly.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("artifact hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// Result type for artifact operations.
pub type ArtifactResult<T> = std::result::Result<T, ArtifactError>;
