//! Property tests over generated values.

use proptest::prelude::*;
use strata_value::{Scalar, Value};

use crate::codec::{decode, encode};
use crate::config::{DiffConfig, DiffStrategy};
use crate::engine::Differ;
use crate::error::DiffError;
use crate::{apply_diff, diff, equivalent};

/// Small domains so generated values collide often enough to exercise
/// matching, duplicates and unchanged keys. The key pool includes spellings
/// of the removal-marker key.
fn scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        Just(Scalar::Null),
        any::<bool>().prop_map(Scalar::Bool),
        (-3i64..3).prop_map(Scalar::Int),
        prop::sample::select(vec![-1.5, 0.0, 2.25]).prop_map(Scalar::Float),
        prop::sample::select(vec!["", "a", "b", "1"]).prop_map(|s| Scalar::String(s.to_string())),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_map(Value::Scalar).prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Sequence),
            prop::collection::vec((prop::sample::select(vec!["a", "b", "c", "$removed", "$$removed"]), inner), 0..5)
                .prop_map(|pairs| pairs.into_iter().collect::<Value>()),
        ]
    })
}

proptest! {
    #[test]
    fn round_trip(orig in value(), other in value()) {
        let applied = apply_diff(&orig, &diff(&orig, &other));
        prop_assert!(equivalent(&applied, &other), "{} vs {}", applied, other);
    }

    #[test]
    fn round_trip_remove_equivalent_strategy(orig in value(), other in value()) {
        let differ = Differ::new(DiffConfig::unbounded().with_strategy(DiffStrategy::RemoveEquivalent));
        let d = differ.diff(&orig, &other).unwrap();
        let applied = differ.apply(&orig, &d).unwrap();
        prop_assert!(equivalent(&applied, &other));
    }

    #[test]
    fn strategies_produce_identical_diffs(orig in value(), other in value()) {
        let add = Differ::new(DiffConfig::unbounded()).diff(&orig, &other).unwrap();
        let remove = Differ::new(DiffConfig::unbounded().with_strategy(DiffStrategy::RemoveEquivalent))
            .diff(&orig, &other)
            .unwrap();
        prop_assert_eq!(add, remove);
    }

    #[test]
    fn self_diff_is_empty(x in value()) {
        let d = diff(&x, &x);
        if x.is_composite() {
            prop_assert!(d.is_empty());
        }
        prop_assert!(equivalent(&apply_diff(&x, &d), &x));
    }

    #[test]
    fn empty_diff_iff_equivalent(orig in value(), other in value()) {
        if orig.same_composite(&other) {
            prop_assert_eq!(diff(&orig, &other).is_empty(), equivalent(&orig, &other));
        }
    }

    #[test]
    fn equivalence_is_reflexive_and_symmetric(a in value(), b in value()) {
        prop_assert!(equivalent(&a, &a));
        prop_assert_eq!(equivalent(&a, &b), equivalent(&b, &a));
    }

    #[test]
    fn equivalence_ignores_sequence_order(items in prop::collection::vec(value(), 0..6)) {
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assert!(equivalent(&Value::Sequence(items), &Value::Sequence(reversed)));
    }

    #[test]
    fn diff_from_empty_materializes_anywhere(other in value(), target in value()) {
        if let Some(empty) = other.empty_like() {
            let d = diff(&empty, &other);
            prop_assert!(equivalent(&d.materialize(), &other));
            if !target.same_variant(&other) {
                prop_assert!(equivalent(&apply_diff(&target, &d), &other));
            }
        }
    }

    #[test]
    fn codec_preserves_application(orig in value(), other in value()) {
        let d = diff(&orig, &other);
        match encode(&d) {
            Ok(encoded) => {
                let decoded = decode(&encoded).unwrap();
                prop_assert!(equivalent(&apply_diff(&orig, &decoded), &other));
            }
            // Only an added element shaped like a marker is unencodable.
            Err(err) => prop_assert_eq!(err, DiffError::ReservedKey),
        }
    }
}
