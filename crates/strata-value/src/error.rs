//! Error types for the value crate.

use thiserror::Error;

/// Errors produced while building or converting values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    /// The input contains something the value model cannot represent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Parsing or rendering an external format failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience type alias for value operations.
pub type Result<T> = std::result::Result<T, ValueError>;
