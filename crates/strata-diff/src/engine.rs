//! The configured diff engine.
//!
//! [`Differ`] pairs a [`DiffConfig`] with an [`Equivalence`]. Unlike the
//! free functions it validates nesting depth up front, so recursion is
//! bounded by `max_depth` and over-deep input fails with
//! [`DiffError::DepthExceeded`] before any work is done.

use strata_value::Value;
use tracing::debug;

use crate::apply::apply_diff_with;
use crate::config::DiffConfig;
use crate::diff::compute;
use crate::equivalence::{Equivalence, Strict};
use crate::error::{DiffError, DiffResult};
use crate::model::Diff;

#[derive(Clone, Debug)]
pub struct Differ<E = Strict> {
    config: DiffConfig,
    equivalence: E,
}

impl Default for Differ<Strict> {
    fn default() -> Self {
        Self::new(DiffConfig::default())
    }
}

impl Differ<Strict> {
    /// An engine using [`Strict`] equivalence.
    pub fn new(config: DiffConfig) -> Self {
        Self {
            config,
            equivalence: Strict,
        }
    }
}

impl<E: Equivalence> Differ<E> {
    /// Swap in a different equivalence, keeping the configuration.
    pub fn with_equivalence<F: Equivalence>(self, equivalence: F) -> Differ<F> {
        Differ {
            config: self.config,
            equivalence,
        }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    pub fn equivalence(&self) -> &E {
        &self.equivalence
    }

    fn check_value(&self, value: &Value) -> DiffResult<()> {
        match self.config.max_depth {
            Some(limit) if value.exceeds_depth(limit) => Err(DiffError::DepthExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn check_diff(&self, diff: &Diff) -> DiffResult<()> {
        match self.config.max_depth {
            Some(limit) if diff.exceeds_depth(limit) => Err(DiffError::DepthExceeded { limit }),
            _ => Ok(()),
        }
    }

    /// Check two values for equivalence.
    pub fn equivalent(&self, a: &Value, b: &Value) -> DiffResult<bool> {
        self.check_value(a)?;
        self.check_value(b)?;
        Ok(self.equivalence.equivalent(a, b))
    }

    /// Compute the diff from `orig` to `other`.
    pub fn diff(&self, orig: &Value, other: &Value) -> DiffResult<Diff> {
        self.check_value(orig)?;
        self.check_value(other)?;

        debug!(
            orig = %orig.kind(),
            other = %other.kind(),
            strategy = ?self.config.strategy,
            "computing diff"
        );
        let diff = compute(orig, other, &self.equivalence, self.config.strategy);
        debug!(changes = diff.len(), empty = diff.is_empty(), "diff computed");

        Ok(diff)
    }

    /// Apply `diff` to `orig`.
    pub fn apply(&self, orig: &Value, diff: &Diff) -> DiffResult<Value> {
        self.check_value(orig)?;
        self.check_diff(diff)?;

        debug!(orig = %orig.kind(), changes = diff.len(), "applying diff");
        Ok(apply_diff_with(orig, diff, &self.equivalence))
    }
}
