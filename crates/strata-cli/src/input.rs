//! Reading documents, diffs and fixtures from disk.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use strata_diff::{codec, Diff};
use strata_value::Value;
use tracing::debug;

/// One `{orig, new, diff}` case of a fixture file.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub orig: Value,
    pub new: Value,
    pub diff: Diff,
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Read a document. `.toml` files are parsed as TOML, everything else as JSON.
pub fn read_value(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "read document");

    let value = if is_toml(path) {
        Value::from_toml_str(&text)
    } else {
        Value::from_json_str(&text)
    };
    value.with_context(|| format!("parsing {}", path.display()))
}

/// Read an encoded diff (always JSON).
pub fn read_diff(path: &Path) -> anyhow::Result<Diff> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    codec::from_json_str(&text).with_context(|| format!("decoding diff {}", path.display()))
}

/// Read a JSON array of fixture cases.
pub fn read_fixtures(path: &Path) -> anyhow::Result<Vec<Fixture>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let fixtures: Vec<Fixture> = serde_json::from_str(&text)
        .with_context(|| format!("parsing fixtures {}", path.display()))?;
    debug!(path = %path.display(), cases = fixtures.len(), "read fixtures");
    Ok(fixtures)
}

/// Write `text` to `output`, or to stdout when no path is given.
pub fn write_output(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, format!("{text}\n"))
            .with_context(|| format!("writing {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
