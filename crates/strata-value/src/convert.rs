//! Conversions between [`Value`] and the external formats Strata reads.
//!
//! Conversions fail fast: anything the value model cannot represent
//! exactly (unsigned integers beyond `i64::MAX`, non-finite floats on the
//! way out to JSON, TOML datetimes) is rejected with
//! [`ValueError::InvalidInput`] instead of being coerced.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;

use crate::error::{Result, ValueError};
use crate::value::{Map, Scalar, Value};

impl Value {
    /// Parse a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let json: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ValueError::Serialization(e.to_string()))?;
        Value::try_from(json)
    }

    /// Parse a TOML document. The root is always a mapping.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(text).map_err(|e| ValueError::Serialization(e.to_string()))?;
        Value::try_from(toml::Value::Table(table))
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        let json = serde_json::Value::try_from(self)?;
        serde_json::to_string_pretty(&json).map_err(|e| ValueError::Serialization(e.to_string()))
    }
}

fn number_to_scalar(n: &Number) -> Result<Scalar> {
    if let Some(i) = n.as_i64() {
        Ok(Scalar::Int(i))
    } else if n.is_u64() {
        Err(ValueError::InvalidInput(format!(
            "integer {n} does not fit in a signed 64-bit integer"
        )))
    } else if let Some(f) = n.as_f64() {
        Ok(Scalar::Float(f))
    } else {
        Err(ValueError::InvalidInput(format!("unsupported number {n}")))
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ValueError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        Ok(match json {
            Json::Null => Value::NULL,
            Json::Bool(b) => Value::from(b),
            Json::Number(n) => Value::Scalar(number_to_scalar(&n)?),
            Json::String(s) => Value::from(s),
            Json::Array(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Json::Object(object) => Value::Mapping(
                object
                    .into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<Result<Map>>()?,
            ),
        })
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self> {
        use serde_json::Value as Json;

        Ok(match value {
            Value::Scalar(Scalar::Null) => Json::Null,
            Value::Scalar(Scalar::Bool(b)) => Json::Bool(*b),
            Value::Scalar(Scalar::Int(i)) => Json::Number((*i).into()),
            Value::Scalar(Scalar::Float(f)) => Number::from_f64(*f)
                .map(Json::Number)
                .ok_or_else(|| ValueError::InvalidInput(format!("{f} has no JSON representation")))?,
            Value::Scalar(Scalar::String(s)) => Json::String(s.clone()),
            Value::Sequence(items) => Json::Array(
                items
                    .iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Mapping(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), serde_json::Value::try_from(v)?)))
                    .collect::<Result<serde_json::Map<_, _>>>()?,
            ),
        })
    }
}

impl TryFrom<toml::Value> for Value {
    type Error = ValueError;

    fn try_from(toml: toml::Value) -> Result<Self> {
        use toml::Value as Toml;

        Ok(match toml {
            Toml::String(s) => Value::from(s),
            Toml::Integer(i) => Value::from(i),
            Toml::Float(f) => Value::from(f),
            Toml::Boolean(b) => Value::from(b),
            Toml::Datetime(dt) => {
                return Err(ValueError::InvalidInput(format!(
                    "datetime {dt} is not a supported scalar"
                )))
            }
            Toml::Array(items) => Value::Sequence(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Toml::Table(table) => Value::Mapping(
                table
                    .into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<Result<Map>>()?,
            ),
        })
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(s) => s.serialize(serializer),
            Value::Sequence(items) => serializer.collect_seq(items),
            Value::Mapping(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Value::try_from(json).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_keep_their_type() {
        assert_eq!(Value::try_from(json!(1)).unwrap(), Value::from(1));
        assert_eq!(Value::try_from(json!(1.0)).unwrap(), Value::from(1.0));
        assert_eq!(Value::try_from(json!(true)).unwrap(), Value::from(true));
        assert_eq!(Value::try_from(json!("1")).unwrap(), Value::from("1"));
        assert_eq!(Value::try_from(json!(null)).unwrap(), Value::NULL);
    }

    #[test]
    fn json_nested_structure() {
        let value = Value::try_from(json!({"k": [1, {"x": "y"}]})).unwrap();
        let inner: Value = [("x", Value::from("y"))].into_iter().collect();
        let expected: Value = [("k", Value::from(vec![Value::from(1), inner]))]
            .into_iter()
            .collect();
        assert_eq!(value, expected);
    }

    #[test]
    fn json_rejects_oversized_unsigned() {
        let err = Value::try_from(json!(u64::MAX)).unwrap_err();
        assert!(matches!(err, ValueError::InvalidInput(_)));
    }

    #[test]
    fn json_output_rejects_nan() {
        let err = serde_json::Value::try_from(&Value::from(f64::NAN)).unwrap_err();
        assert!(matches!(err, ValueError::InvalidInput(_)));
    }

    #[test]
    fn json_output_matches_input() {
        let json = json!({"a": [1, 2.5, "s", null, false], "b": {"c": {}}});
        let value = Value::try_from(json.clone()).unwrap();
        assert_eq!(serde_json::Value::try_from(&value).unwrap(), json);
    }

    #[test]
    fn parse_json_text() {
        let value = Value::from_json_str(r#"{"a": [1, 2]}"#).unwrap();
        assert_eq!(value.as_mapping().unwrap().len(), 1);
        assert!(matches!(
            Value::from_json_str("{not json"),
            Err(ValueError::Serialization(_))
        ));
    }

    #[test]
    fn parse_toml_text() {
        let value = Value::from_toml_str("name = \"x\"\n[table]\nlist = [1, 2]\n").unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map["name"], Value::from("x"));
        let table = map["table"].as_mapping().unwrap();
        assert_eq!(table["list"], Value::from(vec![Value::from(1), Value::from(2)]));
    }

    #[test]
    fn toml_rejects_datetimes() {
        let err = Value::from_toml_str("when = 1979-05-27T07:32:00Z\n").unwrap_err();
        assert!(matches!(err, ValueError::InvalidInput(_)));
    }

    #[test]
    fn serde_roundtrip_through_json() {
        let value = Value::try_from(json!({"list": [1, "two", 3.0], "flag": true})).unwrap();
        let text = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, back);
    }

    #[test]
    fn pretty_json_output() {
        let value = Value::try_from(json!({"a": 1})).unwrap();
        assert_eq!(value.to_json_string_pretty().unwrap(), "{\n  \"a\": 1\n}");
    }
}
