use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use strata_diff::{DiffConfig, DiffStrategy};

/// Settings read from the `--config` TOML file. Command-line flags win.
///
/// ```toml
/// [diff]
/// max_depth = 128
/// strategy = "remove-equivalent"
///
/// [equivalence]
/// float_tolerance = 1e-9
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub diff: DiffConfig,
    pub equivalence: EquivalenceConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquivalenceConfig {
    /// Absolute tolerance for float comparison. Strict when unset.
    pub float_tolerance: Option<f64>,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn with_overrides(
        mut self,
        max_depth: Option<usize>,
        strategy: Option<DiffStrategy>,
        tolerance: Option<f64>,
    ) -> Self {
        if let Some(max_depth) = max_depth {
            self.diff.max_depth = Some(max_depth);
        }
        if let Some(strategy) = strategy {
            self.diff.strategy = strategy;
        }
        if tolerance.is_some() {
            self.equivalence.float_tolerance = tolerance;
        }
        self
    }
}
