//! The diff representation.
//!
//! A [`Diff`] mirrors the shape of the values it was computed from. Removal
//! markers exist only as [`DiffEntry::Remove`] and [`SequenceEdit::Remove`],
//! so a marker can never end up inside an application [`Value`].

use indexmap::IndexMap;
use strata_value::Value;

use crate::equivalence::{Equivalence, Strict};

/// A sparse description of how to turn one value into an equivalent of
/// another.
#[derive(Clone, Debug, PartialEq)]
pub enum Diff {
    /// Changes to the keys of a mapping. Untouched keys are absent.
    Mapping(IndexMap<String, DiffEntry>),
    /// Additions and removals for a sequence. Untouched elements are absent.
    Sequence(Vec<SequenceEdit>),
    /// Wholesale replacement of the original value.
    Replace(Value),
}

/// The change recorded for a single mapping key.
#[derive(Clone, Debug, PartialEq)]
pub enum DiffEntry {
    /// Both sides held the same composite variant; apply this nested diff.
    Patch(Diff),
    /// Set the key to this value (new key, or a value of a different shape).
    Replace(Value),
    /// Delete the key. Carries the removed value for inspection.
    Remove(Value),
}

/// A single change to a sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum SequenceEdit {
    /// Append this element.
    Add(Value),
    /// Remove one element equivalent to this one.
    Remove(Value),
}

/// Counts of the changes in a diff, nested diffs included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Keys set or elements appended.
    pub written: usize,
    /// Keys or elements removed.
    pub removed: usize,
    /// Keys whose values carry a nested diff.
    pub patched: usize,
}

impl DiffSummary {
    pub fn total(&self) -> usize {
        self.written + self.removed + self.patched
    }
}

impl Diff {
    /// The diff between two equivalent mappings.
    pub fn empty_mapping() -> Self {
        Diff::Mapping(IndexMap::new())
    }

    /// The diff between two equivalent sequences.
    pub fn empty_sequence() -> Self {
        Diff::Sequence(Vec::new())
    }

    /// Returns `true` for a mapping or sequence diff with no changes.
    ///
    /// A replacement is never empty, even when it replaces a scalar with an
    /// equal one.
    pub fn is_empty(&self) -> bool {
        match self {
            Diff::Mapping(entries) => entries.is_empty(),
            Diff::Sequence(edits) => edits.is_empty(),
            Diff::Replace(_) => false,
        }
    }

    /// Number of top-level changes.
    pub fn len(&self) -> usize {
        match self {
            Diff::Mapping(entries) => entries.len(),
            Diff::Sequence(edits) => edits.len(),
            Diff::Replace(_) => 1,
        }
    }

    /// Count every change, descending into nested diffs.
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        let mut stack = vec![self];
        while let Some(diff) = stack.pop() {
            match diff {
                Diff::Replace(_) => summary.written += 1,
                Diff::Sequence(edits) => {
                    for edit in edits {
                        match edit {
                            SequenceEdit::Add(_) => summary.written += 1,
                            SequenceEdit::Remove(_) => summary.removed += 1,
                        }
                    }
                }
                Diff::Mapping(entries) => {
                    for entry in entries.values() {
                        match entry {
                            DiffEntry::Patch(inner) => {
                                summary.patched += 1;
                                stack.push(inner);
                            }
                            DiffEntry::Replace(_) => summary.written += 1,
                            DiffEntry::Remove(_) => summary.removed += 1,
                        }
                    }
                }
            }
        }
        summary
    }

    /// Returns `true` as soon as the diff, or any value it carries, nests
    /// deeper than `limit`. Depth is counted the same way as
    /// [`Value::depth`], without recursion.
    pub fn exceeds_depth(&self, limit: usize) -> bool {
        let mut stack = vec![(self, 0usize)];
        while let Some((diff, depth)) = stack.pop() {
            let carried: Vec<&Value> = match diff {
                Diff::Replace(value) => {
                    if value.exceeds_depth(limit - depth) {
                        return true;
                    }
                    continue;
                }
                Diff::Sequence(edits) => edits
                    .iter()
                    .map(|edit| match edit {
                        SequenceEdit::Add(v) | SequenceEdit::Remove(v) => v,
                    })
                    .collect(),
                Diff::Mapping(entries) => {
                    let mut carried = Vec::new();
                    for entry in entries.values() {
                        match entry {
                            DiffEntry::Patch(inner) => stack.push((inner, depth + 1)),
                            DiffEntry::Replace(v) | DiffEntry::Remove(v) => carried.push(v),
                        }
                    }
                    carried
                }
            };
            if depth + 1 > limit {
                return true;
            }
            let remaining = limit - (depth + 1);
            if carried.iter().any(|v| v.exceeds_depth(remaining)) {
                return true;
            }
        }
        false
    }

    /// Compare two diffs under [`Strict`] equivalence.
    pub fn equivalent(&self, other: &Diff) -> bool {
        self.equivalent_with(other, &Strict)
    }

    /// Compare two diffs: same shape, mapping entries matched by key,
    /// sequence edits matched as a multiset, and carried values compared
    /// with `eq`. A removal marker only ever matches another removal marker.
    pub fn equivalent_with<E>(&self, other: &Diff, eq: &E) -> bool
    where
        E: Equivalence + ?Sized,
    {
        match (self, other) {
            (Diff::Replace(a), Diff::Replace(b)) => eq.equivalent(a, b),
            (Diff::Mapping(a), Diff::Mapping(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, entry)| {
                        b.get(key)
                            .is_some_and(|other| entry_equivalent(entry, other, eq))
                    })
            }
            (Diff::Sequence(a), Diff::Sequence(b)) => {
                if a.len() != b.len() {
                    return false;
                }
                let mut pool: Vec<&SequenceEdit> = b.iter().collect();
                for edit in a {
                    match pool
                        .iter()
                        .position(|candidate| edit_equivalent(edit, candidate, eq))
                    {
                        Some(idx) => {
                            pool.remove(idx);
                        }
                        None => return false,
                    }
                }
                true
            }
            _ => false,
        }
    }
}

fn entry_equivalent<E>(a: &DiffEntry, b: &DiffEntry, eq: &E) -> bool
where
    E: Equivalence + ?Sized,
{
    match (a, b) {
        (DiffEntry::Patch(x), DiffEntry::Patch(y)) => x.equivalent_with(y, eq),
        (DiffEntry::Replace(x), DiffEntry::Replace(y)) => eq.equivalent(x, y),
        (DiffEntry::Remove(x), DiffEntry::Remove(y)) => eq.equivalent(x, y),
        _ => false,
    }
}

fn edit_equivalent<E>(a: &SequenceEdit, b: &SequenceEdit, eq: &E) -> bool
where
    E: Equivalence + ?Sized,
{
    match (a, b) {
        (SequenceEdit::Add(x), SequenceEdit::Add(y)) => eq.equivalent(x, y),
        (SequenceEdit::Remove(x), SequenceEdit::Remove(y)) => eq.equivalent(x, y),
        _ => false,
    }
}
