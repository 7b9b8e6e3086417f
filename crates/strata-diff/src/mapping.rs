//! Mapping diffs.
//!
//! A mapping diff holds an entry for every key of the new mapping whose value
//! is missing from or not equivalent to the original, followed by a removal
//! marker for every key the new mapping dropped. Values that are composites
//! of the same variant on both sides get a nested diff; everything else is
//! replaced wholesale.

use indexmap::IndexMap;
use strata_value::{Map, Value};

use crate::config::DiffStrategy;
use crate::diff::compute;
use crate::equivalence::Equivalence;
use crate::model::DiffEntry;

pub(crate) fn diff_mappings<E>(
    orig: &Map,
    other: &Map,
    eq: &E,
    strategy: DiffStrategy,
) -> IndexMap<String, DiffEntry>
where
    E: Equivalence + ?Sized,
{
    let mut entries = match strategy {
        DiffStrategy::AddDifferent => add_different(orig, other, eq, strategy),
        DiffStrategy::RemoveEquivalent => remove_equivalent(orig, other, eq, strategy),
    };

    for key in removed_keys(orig, other) {
        entries.insert(key.clone(), DiffEntry::Remove(orig[key].clone()));
    }

    entries
}

/// Keys of `other` that are absent from `orig` or hold a non-equivalent value.
pub fn different_keys<'a, E>(orig: &'a Map, other: &'a Map, eq: &'a E) -> impl Iterator<Item = &'a String>
where
    E: Equivalence + ?Sized,
{
    other.iter().filter_map(move |(key, value)| match orig.get(key) {
        Some(current) if eq.equivalent(value, current) => None,
        _ => Some(key),
    })
}

/// Keys present in both mappings with equivalent values.
pub fn equivalent_keys<'a, E>(orig: &'a Map, other: &'a Map, eq: &'a E) -> impl Iterator<Item = &'a String>
where
    E: Equivalence + ?Sized,
{
    other.iter().filter_map(move |(key, value)| match orig.get(key) {
        Some(current) if eq.equivalent(value, current) => Some(key),
        _ => None,
    })
}

/// Keys of `other` that `orig` does not have.
pub fn added_keys<'a>(orig: &'a Map, other: &'a Map) -> impl Iterator<Item = &'a String> {
    removed_keys(other, orig)
}

/// Keys of `orig` that `other` does not have.
pub fn removed_keys<'a>(orig: &'a Map, other: &'a Map) -> impl Iterator<Item = &'a String> {
    orig.keys().filter(move |key| !other.contains_key(*key))
}

fn entry_for<E>(current: Option<&Value>, new: &Value, eq: &E, strategy: DiffStrategy) -> DiffEntry
where
    E: Equivalence + ?Sized,
{
    match current {
        Some(current) if current.same_composite(new) => {
            DiffEntry::Patch(compute(current, new, eq, strategy))
        }
        _ => DiffEntry::Replace(new.clone()),
    }
}

fn add_different<E>(orig: &Map, other: &Map, eq: &E, strategy: DiffStrategy) -> IndexMap<String, DiffEntry>
where
    E: Equivalence + ?Sized,
{
    different_keys(orig, other, eq)
        .map(|key| (key.clone(), entry_for(orig.get(key), &other[key], eq, strategy)))
        .collect()
}

fn remove_equivalent<E>(orig: &Map, other: &Map, eq: &E, strategy: DiffStrategy) -> IndexMap<String, DiffEntry>
where
    E: Equivalence + ?Sized,
{
    let mut remaining = other.clone();
    remaining.retain(|key, value| !orig.get(key).is_some_and(|current| eq.equivalent(value, current)));

    remaining
        .into_iter()
        .map(|(key, value)| {
            let entry = match orig.get(&key) {
                Some(current) if current.same_composite(&value) => {
                    DiffEntry::Patch(compute(current, &value, eq, strategy))
                }
                _ => DiffEntry::Replace(value),
            };
            (key, entry)
        })
        .collect()
}
