//! Error types for stream reading and field access.

use thiserror::Error;

use crate::checker::SyntaxError;

/// Errors that can occur while reading a value from a stream or pulling a
/// typed field out of a tree.
///
/// A missing field is never an error: accessors report it as `None`/`false`.
#[derive(Error, Debug)]
pub enum JsonMoreError {
    /// The stream ended part-way through a value.
    #[error("end of stream after {read} bytes were read")]
    Truncated { read: usize },

    /// The underlying reader failed.
    #[error("stream read error: {0}")]
    Io(#[from] std::io::Error),

    /// The incremental grammar check rejected a byte.
    /// `offset` is the 0-based position of that byte within the value.
    #[error("malformed JSON at byte {offset}: {source}")]
    Malformed {
        offset: usize,
        #[source]
        source: SyntaxError,
    },

    /// The value did not complete within the configured byte limit.
    #[error("value is bigger than the {limit}-byte read limit")]
    TooLarge { limit: usize },

    /// `serde_json` refused a span the grammar check accepted
    /// (e.g. invalid UTF-8 inside a string).
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field held a value of the wrong JSON type.
    #[error("field '{field}': expected {expected}, got '{found}'")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// An array field had fewer elements than the caller asked for.
    #[error("field '{field}': expected at least {expected} elements, got {found}")]
    ShortArray {
        field: String,
        expected: usize,
        found: usize,
    },
}

/// Coarse classification of a [`JsonMoreError`], for callers that branch on
/// the failure without matching every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Truncated,
    Io,
    Malformed,
    TooLarge,
    Parse,
    TypeMismatch,
    ShortArray,
}

impl JsonMoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JsonMoreError::Truncated { .. } => ErrorKind::Truncated,
            JsonMoreError::Io(_) => ErrorKind::Io,
            JsonMoreError::Malformed { .. } => ErrorKind::Malformed,
            JsonMoreError::TooLarge { .. } => ErrorKind::TooLarge,
            JsonMoreError::Parse(_) => ErrorKind::Parse,
            JsonMoreError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            JsonMoreError::ShortArray { .. } => ErrorKind::ShortArray,
        }
    }
}

/// Convenience alias used throughout jsonmore-core.
pub type Result<T> = std::result::Result<T, JsonMoreError>;
