//! Diff application.
//!
//! Application never mutates its inputs; unchanged parts of the original are
//! copied into the result. Removing a key or element that is not there is a
//! no-op, so applying a diff twice only ever re-adds, never fails.

use strata_value::{Map, Value};
use tracing::trace;

use crate::equivalence::{Equivalence, Strict};
use crate::model::{Diff, DiffEntry, SequenceEdit};

/// Apply `diff` to `orig` with [`Strict`] equivalence for element removal.
pub fn apply_diff(orig: &Value, diff: &Diff) -> Value {
    apply_diff_with(orig, diff, &Strict)
}

/// Apply `diff` to `orig`, removing sequence elements equivalent to each
/// removal marker under `eq`.
///
/// A mapping or sequence diff applied to a value of another variant is
/// materialized on its own, as if applied to an empty value of its variant.
pub fn apply_diff_with<E>(orig: &Value, diff: &Diff, eq: &E) -> Value
where
    E: Equivalence + ?Sized,
{
    match (orig, diff) {
        (Value::Mapping(map), Diff::Mapping(entries)) => Value::Mapping(apply_mapping(map, entries, eq)),
        (Value::Sequence(items), Diff::Sequence(edits)) => Value::Sequence(apply_sequence(items, edits, eq)),
        (_, Diff::Mapping(entries)) => Value::Mapping(apply_mapping(&Map::new(), entries, eq)),
        (_, Diff::Sequence(edits)) => Value::Sequence(apply_sequence(&[], edits, eq)),
        (_, Diff::Replace(value)) => value.clone(),
    }
}

impl Diff {
    /// The value this diff produces without an original to apply to.
    ///
    /// Removal markers are dropped and nested diffs materialized in turn.
    pub fn materialize(&self) -> Value {
        apply_diff(&Value::NULL, self)
    }
}

fn apply_mapping<E>(map: &Map, entries: &indexmap::IndexMap<String, DiffEntry>, eq: &E) -> Map
where
    E: Equivalence + ?Sized,
{
    let mut applied = map.clone();

    for (key, entry) in entries {
        match entry {
            DiffEntry::Remove(_) => {
                if applied.shift_remove(key).is_none() {
                    trace!(%key, "removed key already absent");
                }
            }
            DiffEntry::Patch(inner) => {
                let current = map.get(key).unwrap_or(&Value::NULL);
                applied.insert(key.clone(), apply_diff_with(current, inner, eq));
            }
            DiffEntry::Replace(value) => {
                applied.insert(key.clone(), value.clone());
            }
        }
    }

    applied
}

/// Removals are applied before additions, so a removal can only consume an
/// element of the original and edit order does not matter.
fn apply_sequence<E>(items: &[Value], edits: &[SequenceEdit], eq: &E) -> Vec<Value>
where
    E: Equivalence + ?Sized,
{
    let mut applied = items.to_vec();

    for edit in edits {
        if let SequenceEdit::Remove(target) = edit {
            match applied.iter().position(|candidate| eq.equivalent(target, candidate)) {
                Some(idx) => {
                    applied.remove(idx);
                }
                None => trace!(element = %target, "removed element already absent"),
            }
        }
    }

    applied.extend(edits.iter().filter_map(|edit| match edit {
        SequenceEdit::Add(value) => Some(value.clone()),
        SequenceEdit::Remove(_) => None,
    }));

    applied
}
