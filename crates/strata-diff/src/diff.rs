//! Diff computation: dispatch on the variants of both inputs.

use strata_value::Value;

use crate::config::DiffStrategy;
use crate::equivalence::{Equivalence, Strict};
use crate::mapping::diff_mappings;
use crate::model::Diff;
use crate::sequence::diff_sequences;

/// Compute the diff from `orig` to `other` with [`Strict`] equivalence.
///
/// `apply_diff(orig, &diff(orig, other))` is equivalent to `other`.
pub fn diff(orig: &Value, other: &Value) -> Diff {
    diff_with(orig, other, &Strict)
}

/// Compute the diff from `orig` to `other` using a caller-supplied
/// equivalence for deciding what is unchanged.
pub fn diff_with<E>(orig: &Value, other: &Value, eq: &E) -> Diff
where
    E: Equivalence + ?Sized,
{
    compute(orig, other, eq, DiffStrategy::default())
}

/// - two mappings: keyed diff, recursing where both sides are composites;
/// - two sequences: multiset additions and removals;
/// - anything else: replace with `other`.
pub(crate) fn compute<E>(orig: &Value, other: &Value, eq: &E, strategy: DiffStrategy) -> Diff
where
    E: Equivalence + ?Sized,
{
    match (orig, other) {
        (Value::Mapping(a), Value::Mapping(b)) => Diff::Mapping(diff_mappings(a, b, eq, strategy)),
        (Value::Sequence(a), Value::Sequence(b)) => Diff::Sequence(diff_sequences(a, b, eq)),
        _ => Diff::Replace(other.clone()),
    }
}
