//! Error types for lernpfad-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while interpreting identifiers from content or storage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid CEFR level: {0}")]
    InvalidLevel(String),

    #[error("invalid lesson id: {0}")]
    InvalidLessonId(String),

    #[error("item has no usable identifier")]
    MissingIdentifier,
}
