use serde::{Deserialize, Serialize};

/// Default bound on nesting depth for [`Differ`](crate::Differ).
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// How mapping diffs are assembled.
///
/// Both strategies produce identical diffs. `AddDifferent` builds the diff
/// from the differing keys and is cheaper when few keys changed;
/// `RemoveEquivalent` copies the new mapping and strips the unchanged keys,
/// which is cheaper when most keys changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffStrategy {
    #[default]
    AddDifferent,
    RemoveEquivalent,
}

/// Configuration for the diff engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Inputs nesting deeper than this are rejected before any work is
    /// done. `None` disables the check.
    pub max_depth: Option<usize>,
    /// Mapping diff strategy.
    pub strategy: DiffStrategy,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            strategy: DiffStrategy::default(),
        }
    }
}

impl DiffConfig {
    /// A configuration without a depth bound.
    pub fn unbounded() -> Self {
        Self {
            max_depth: None,
            ..Default::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_strategy(mut self, strategy: DiffStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}
