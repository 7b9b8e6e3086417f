//! Order-independent, type-strict structural equivalence.
//!
//! Two values are equivalent when they have the same variant and:
//!
//! - scalars compare equal, variant tag included (`1` is not `true`);
//! - mappings have the same key set with pairwise equivalent values;
//! - sequences have the same length and a perfect matching of equivalent
//!   elements, found greedily: each element of the first sequence consumes
//!   the first still-unmatched equivalent element of the second.
//!
//! Greedy matching is exact here because equivalence partitions values into
//! classes; any element of a class can stand in for any other.

use strata_value::{Map, Scalar, Value};

/// Capability for comparing two values.
///
/// Implementors supply the leaf comparison and inherit the structural
/// recursion. Closures `Fn(&Value, &Value) -> bool` implement the trait by
/// replacing the whole comparison.
pub trait Equivalence {
    /// Compare two scalars.
    fn scalars_equivalent(&self, a: &Scalar, b: &Scalar) -> bool;

    /// Compare two values of any variant.
    fn equivalent(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Scalar(x), Value::Scalar(y)) => self.scalars_equivalent(x, y),
            (Value::Sequence(x), Value::Sequence(y)) => sequences_equivalent(self, x, y),
            (Value::Mapping(x), Value::Mapping(y)) => mappings_equivalent(self, x, y),
            _ => false,
        }
    }
}

/// The default equivalence: native scalar equality with a variant check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Strict;

impl Equivalence for Strict {
    fn scalars_equivalent(&self, a: &Scalar, b: &Scalar) -> bool {
        a == b
    }
}

/// Floats within an absolute `tolerance` are equivalent; every other scalar
/// compares strictly. `Int` and `Float` stay distinct variants.
///
/// Tolerance comparison is not transitive, so the round-trip guarantee only
/// holds when no two values in play sit within tolerance of a third.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Approximate {
    pub tolerance: f64,
}

impl Approximate {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }
}

impl Equivalence for Approximate {
    fn scalars_equivalent(&self, a: &Scalar, b: &Scalar) -> bool {
        match (a, b) {
            (Scalar::Float(x), Scalar::Float(y)) => x == y || (x - y).abs() <= self.tolerance,
            _ => a == b,
        }
    }
}

impl<F> Equivalence for F
where
    F: Fn(&Value, &Value) -> bool,
{
    fn scalars_equivalent(&self, a: &Scalar, b: &Scalar) -> bool {
        self(&Value::Scalar(a.clone()), &Value::Scalar(b.clone()))
    }

    fn equivalent(&self, a: &Value, b: &Value) -> bool {
        self(a, b)
    }
}

/// Check two values with the [`Strict`] equivalence.
pub fn equivalent(a: &Value, b: &Value) -> bool {
    Strict.equivalent(a, b)
}

/// Same key set, pairwise equivalent values.
pub fn mappings_equivalent<E>(eq: &E, a: &Map, b: &Map) -> bool
where
    E: Equivalence + ?Sized,
{
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| eq.equivalent(value, other)))
}

/// Same length and a greedy perfect matching of equivalent elements.
pub fn sequences_equivalent<E>(eq: &E, a: &[Value], b: &[Value]) -> bool
where
    E: Equivalence + ?Sized,
{
    if a.len() != b.len() {
        return false;
    }

    let mut pool: Vec<&Value> = b.iter().collect();
    for item in a {
        match pool.iter().position(|candidate| eq.equivalent(item, candidate)) {
            Some(idx) => {
                pool.remove(idx);
            }
            None => return false,
        }
    }
    pool.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::try_from(json).unwrap()
    }

    #[test]
    fn scalar_type_strictness() {
        assert!(!equivalent(&v(json!(1)), &v(json!("1"))));
        assert!(!equivalent(&v(json!(1)), &v(json!(true))));
        assert!(!equivalent(&v(json!(true)), &v(json!("1"))));
        assert!(!equivalent(&v(json!(1)), &v(json!(1.0))));

        assert!(equivalent(&v(json!(1)), &v(json!(1))));
        assert!(equivalent(&v(json!("")), &v(json!(""))));
        assert!(equivalent(&v(json!(true)), &v(json!(true))));
        assert!(equivalent(&Value::NULL, &Value::NULL));
    }

    #[test]
    fn mismatched_variants_are_never_equivalent() {
        assert!(!equivalent(&v(json!([])), &v(json!({}))));
        assert!(!equivalent(&v(json!(null)), &v(json!({}))));
        assert!(!equivalent(&v(json!([1])), &v(json!(1))));
    }

    #[test]
    fn sequences_ignore_order() {
        assert!(equivalent(&v(json!([1, 2, 3])), &v(json!([3, 1, 2]))));
        assert!(equivalent(
            &v(json!(["value1", "value2", "value3"])),
            &v(json!(["value2", "value3", "value1"]))
        ));
    }

    #[test]
    fn sequences_respect_multiplicity() {
        assert!(!equivalent(&v(json!([1, 2])), &v(json!([1, 2, 2]))));
        assert!(!equivalent(&v(json!([1, 1, 2])), &v(json!([1, 2, 2]))));
        assert!(equivalent(&v(json!([2, 1, 2])), &v(json!([2, 2, 1]))));
    }

    #[test]
    fn nested_sequences_of_mappings() {
        assert!(equivalent(
            &v(json!([{"key2.1": "value2.1"}, {"key2.2": "value2.2"}, {"key2.3": ["value2.4", "value2.3"]}])),
            &v(json!([{"key2.3": ["value2.3", "value2.4"]}, {"key2.1": "value2.1"}, {"key2.2": "value2.2"}]))
        ));
    }

    #[test]
    fn mappings_compare_by_key_set() {
        assert!(equivalent(&v(json!({})), &v(json!({}))));
        assert!(equivalent(
            &v(json!({"foo": "valuefoo", "bar": "valuebar"})),
            &v(json!({"bar": "valuebar", "foo": "valuefoo"}))
        ));
        assert!(!equivalent(
            &v(json!({"nested": {"key2": "value2"}, "key1": "value1"})),
            &v(json!({"nested": {"key3": "value3"}, "key1": "value1"}))
        ));
        assert!(!equivalent(&v(json!({"a": 1})), &v(json!({"a": 1, "b": 2}))));
    }

    #[test]
    fn mappings_with_unordered_lists() {
        assert!(equivalent(
            &v(json!({
                "list1": ["value1", "value2", "value3"],
                "list2": [{"key2.1": "value2.1"}, {"key2.2": "value2.2"}, {"key2.3": ["value2.4", "value2.3"]}]
            })),
            &v(json!({
                "list1": ["value2", "value3", "value1"],
                "list2": [{"key2.3": ["value2.3", "value2.4"]}, {"key2.1": "value2.1"}, {"key2.2": "value2.2"}]
            }))
        ));
    }

    #[test]
    fn approximate_floats() {
        let eq = Approximate::new(0.01);
        assert!(eq.equivalent(&v(json!([1.0, 2.0])), &v(json!([2.005, 0.999]))));
        assert!(!eq.equivalent(&v(json!(1.0)), &v(json!(1.5))));
        assert!(!eq.equivalent(&v(json!(1)), &v(json!(1.0))));
        assert!(eq.equivalent(&v(json!("a")), &v(json!("a"))));
    }

    #[test]
    fn closure_replaces_comparison() {
        let always = |_: &Value, _: &Value| true;
        assert!(always.equivalent(&v(json!(1)), &v(json!({"x": 2}))));
        assert!(always.scalars_equivalent(&Scalar::Int(1), &Scalar::Null));
    }

    #[test]
    fn nan_is_not_equivalent_to_itself() {
        let nan = Value::from(f64::NAN);
        assert!(!equivalent(&nan, &nan));
    }
}
