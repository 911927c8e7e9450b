//! Error types for note domain validation and parsing.

use thiserror::Error;

/// Errors returned while reading typed values out of note metadata.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NoteDomainError {
    /// The `status` field holds a value outside the lifecycle.
    #[error(transparent)]
    InvalidStatus(#[from] ParseNoteStatusError),

    /// The `type` field holds a value outside the known note types.
    #[error(transparent)]
    InvalidType(#[from] ParseNoteTypeError),

    /// A metadata field exists but does not have the expected shape.
    #[error("metadata field '{field}' is malformed: {reason}")]
    MalformedField {
        /// Metadata key.
        field: String,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// A quality score fell outside `0.0..=1.0`.
    #[error("quality score {0} is outside the range 0.0..=1.0")]
    QualityScoreOutOfRange(f64),
}

/// Error returned while parsing a note status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown note status: {0}")]
pub struct ParseNoteStatusError(pub String);

/// Error returned while parsing a note type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown note type: {0}")]
pub struct ParseNoteTypeError(pub String);
