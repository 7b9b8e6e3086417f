//! Structural diff engine for Strata.
//!
//! Computes sparse diffs between two [`Value`](strata_value::Value)s and
//! applies them back, under an order-independent, type-strict equivalence:
//!
//! ```text
//! equivalent(&apply_diff(&orig, &diff(&orig, &other)), &other) == true
//! ```
//!
//! Mappings are diffed key by key, recursing into values that are
//! composites of the same variant on both sides. Sequences are diffed as
//! multisets. Anything else is replaced wholesale.
//!
//! # Key Types
//!
//! - [`Diff`] / [`DiffEntry`] / [`SequenceEdit`] -- The diff representation
//! - [`Equivalence`] / [`Strict`] / [`Approximate`] -- Pluggable comparison
//! - [`Differ`] / [`DiffConfig`] -- Configured engine with a depth bound
//! - [`codec`] -- JSON encoding with `{"$removed": ...}` markers

pub mod apply;
pub mod codec;
pub mod config;
pub mod diff;
pub mod engine;
pub mod equivalence;
pub mod error;
pub mod mapping;
pub mod model;
pub mod sequence;

#[cfg(test)]
mod properties;

pub use apply::{apply_diff, apply_diff_with};
pub use config::{DiffConfig, DiffStrategy, DEFAULT_MAX_DEPTH};
pub use diff::{diff, diff_with};
pub use engine::Differ;
pub use equivalence::{equivalent, Approximate, Equivalence, Strict};
pub use error::{DiffError, DiffResult};
pub use model::{Diff, DiffEntry, DiffSummary, SequenceEdit};
