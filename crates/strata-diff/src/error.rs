//! Error types for the diff crate.

use strata_value::ValueError;

/// Errors that can occur during diff operations.
///
/// Mismatched variants, missing keys and removals of absent elements are
/// defined behavior and never surface here.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// An input nests deeper than the configured bound.
    #[error("nesting depth exceeds the configured limit of {limit}")]
    DepthExceeded { limit: usize },

    /// The input contains something outside the value model.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Encoded data would contain the reserved removal-marker wrapper.
    #[error("a single-key object with key \"$removed\" is reserved for removal markers")]
    ReservedKey,

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<ValueError> for DiffError {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::InvalidInput(msg) => DiffError::InvalidInput(msg),
            ValueError::Serialization(msg) => DiffError::Serialization(msg),
        }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
