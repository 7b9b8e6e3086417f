//! Sequence diffs.
//!
//! Sequences are compared as multisets. Every element of the new sequence
//! is greedily paired with the first still-unpaired equivalent element of
//! the original; unpaired new elements become additions, unpaired original
//! elements become removals. Additions are emitted first.

use strata_value::Value;

use crate::equivalence::Equivalence;
use crate::model::SequenceEdit;

pub(crate) fn diff_sequences<E>(orig: &[Value], other: &[Value], eq: &E) -> Vec<SequenceEdit>
where
    E: Equivalence + ?Sized,
{
    let matching = match_elements(orig, other, eq);

    let mut edits: Vec<SequenceEdit> = matching
        .added
        .into_iter()
        .map(|v| SequenceEdit::Add(v.clone()))
        .collect();
    edits.extend(matching.removed.into_iter().map(|v| SequenceEdit::Remove(v.clone())));
    edits
}

/// The leftovers of a greedy multiset matching between two sequences.
#[derive(Debug, Default, PartialEq)]
pub struct Matching<'a> {
    /// Elements of the new sequence with no counterpart, in their order.
    pub added: Vec<&'a Value>,
    /// Elements of the original sequence with no counterpart, in their order.
    pub removed: Vec<&'a Value>,
}

/// Pair elements of `other` with equivalent elements of `orig`.
///
/// Each pairing consumes one element from both sides, so duplicated
/// elements are matched one for one.
pub fn match_elements<'a, E>(orig: &'a [Value], other: &'a [Value], eq: &E) -> Matching<'a>
where
    E: Equivalence + ?Sized,
{
    let mut unmatched: Vec<&Value> = orig.iter().collect();
    let mut added = Vec::new();

    for item in other {
        match unmatched.iter().position(|candidate| eq.equivalent(item, candidate)) {
            Some(idx) => {
                unmatched.remove(idx);
            }
            None => added.push(item),
        }
    }

    Matching {
        added,
        removed: unmatched,
    }
}
