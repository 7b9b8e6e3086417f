use std::fmt;

use indexmap::IndexMap;

/// Mapping storage. Iteration follows insertion order; equality does not.
pub type Map = IndexMap<String, Value>;

/// An atomic leaf value.
///
/// The derived `PartialEq` compares the variant tag before the payload, so
/// `Int(1)`, `Bool(true)`, `Float(1.0)` and `String("1")` are all distinct.
/// Floats use IEEE equality: `NaN` is never equal to itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// The runtime variant of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Sequence,
    Mapping,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Scalar => "scalar",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

/// A hierarchical value built from scalars, sequences and mappings.
///
/// `PartialEq` is plain structural equality: sequences compare in order.
/// Order-independent comparison lives in the diff engine's equivalence.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Mapping(Map),
}

impl Value {
    /// The `null` scalar.
    pub const NULL: Value = Value::Scalar(Scalar::Null);

    /// An empty mapping.
    pub fn mapping() -> Self {
        Value::Mapping(Map::new())
    }

    /// An empty sequence.
    pub fn sequence() -> Self {
        Value::Sequence(Vec::new())
    }

    /// The runtime variant of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Mapping(_) => ValueKind::Mapping,
        }
    }

    /// Returns `true` for sequences and mappings.
    pub fn is_composite(&self) -> bool {
        !matches!(self, Value::Scalar(_))
    }

    /// Returns `true` if both values have the same variant. Scalars of
    /// different types still share the `Scalar` variant.
    pub fn same_variant(&self, other: &Value) -> bool {
        self.kind() == other.kind()
    }

    /// Returns `true` if both values are sequences or both are mappings.
    pub fn same_composite(&self, other: &Value) -> bool {
        self.is_composite() && self.same_variant(other)
    }

    /// An empty value of this composite's variant, or `None` for scalars.
    pub fn empty_like(&self) -> Option<Value> {
        match self {
            Value::Scalar(_) => None,
            Value::Sequence(_) => Some(Value::sequence()),
            Value::Mapping(_) => Some(Value::mapping()),
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Map> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Nesting depth: scalars are 0, a composite is one more than its
    /// deepest child.
    ///
    /// Computed with an explicit stack, so it is safe on input that is too
    /// deep for the recursive algorithms.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((value, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            match value {
                Value::Scalar(_) => {}
                Value::Sequence(items) => {
                    deepest = deepest.max(depth + 1);
                    stack.extend(items.iter().map(|v| (v, depth + 1)));
                }
                Value::Mapping(map) => {
                    deepest = deepest.max(depth + 1);
                    stack.extend(map.values().map(|v| (v, depth + 1)));
                }
            }
        }
        deepest
    }

    /// Returns `true` as soon as any branch nests deeper than `limit`.
    pub fn exceeds_depth(&self, limit: usize) -> bool {
        let mut stack = vec![(self, 0usize)];
        while let Some((value, depth)) = stack.pop() {
            let children: Box<dyn Iterator<Item = &Value> + '_> = match value {
                Value::Scalar(_) => continue,
                Value::Sequence(items) => Box::new(items.iter()),
                Value::Mapping(map) => Box::new(map.values()),
            };
            if depth + 1 > limit {
                return true;
            }
            stack.extend(children.map(|v| (v, depth + 1)));
        }
        false
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::NULL
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Int(i.into()))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Mapping(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::NULL, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x:?}"),
            Scalar::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Compact JSON-like rendering.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{s}"),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Mapping(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key:?}:{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}
