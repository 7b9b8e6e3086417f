//! JSON encoding for diffs.
//!
//! A diff encodes to the same shape as the values it describes: mapping
//! diffs become objects, sequence diffs become arrays, replacements are
//! written raw, and a removal marker becomes the reserved wrapper
//! `{"$removed": <value>}`.
//!
//! Decoding reads any object or array under a mapping key as a nested diff.
//! A raw replacement therefore comes back as a nested diff, which applies to
//! the same result: a nested diff on a value of another shape materializes
//! on its own.
//!
//! Mapping keys spelled `$removed`, `$$removed` and so on gain one more
//! leading `$` when encoded and lose it when decoded, so no key is ever
//! read as a marker. Added sequence elements are written verbatim; one that
//! is itself a single-key `"$removed"` object cannot be told apart from a
//! marker and fails with [`DiffError::ReservedKey`].

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map as JsonMap, Value as Json};
use strata_value::Value;

use crate::error::{DiffError, DiffResult};
use crate::model::{Diff, DiffEntry, SequenceEdit};

/// Key of the removal-marker wrapper.
pub const REMOVED_KEY: &str = "$removed";

/// Encode a diff as JSON.
pub fn encode(diff: &Diff) -> DiffResult<Json> {
    match diff {
        Diff::Replace(value) => encode_data(value),
        Diff::Sequence(edits) => edits
            .iter()
            .map(|edit| match edit {
                SequenceEdit::Add(value) => encode_added(value),
                SequenceEdit::Remove(value) => encode_removed(value),
            })
            .collect::<DiffResult<Vec<_>>>()
            .map(Json::Array),
        Diff::Mapping(entries) => {
            let object = entries
                .iter()
                .map(|(key, entry)| {
                    let encoded = match entry {
                        DiffEntry::Patch(inner) => encode(inner)?,
                        DiffEntry::Replace(value) => encode_data(value)?,
                        DiffEntry::Remove(value) => encode_removed(value)?,
                    };
                    Ok((escape_key(key), encoded))
                })
                .collect::<DiffResult<JsonMap<_, _>>>()?;
            Ok(Json::Object(object))
        }
    }
}

/// Decode a diff from JSON.
pub fn decode(json: &Json) -> DiffResult<Diff> {
    match json {
        Json::Object(object) => object
            .iter()
            .map(|(key, value)| Ok((unescape_key(key), decode_entry(value)?)))
            .collect::<DiffResult<_>>()
            .map(Diff::Mapping),
        Json::Array(items) => items
            .iter()
            .map(decode_edit)
            .collect::<DiffResult<_>>()
            .map(Diff::Sequence),
        scalar => Ok(Diff::Replace(Value::try_from(scalar.clone())?)),
    }
}

/// Encode a diff as a JSON string.
pub fn to_json_string(diff: &Diff) -> DiffResult<String> {
    serde_json::to_string(&encode(diff)?).map_err(|e| DiffError::Serialization(e.to_string()))
}

/// Encode a diff as a pretty-printed JSON string.
pub fn to_json_string_pretty(diff: &Diff) -> DiffResult<String> {
    serde_json::to_string_pretty(&encode(diff)?).map_err(|e| DiffError::Serialization(e.to_string()))
}

/// Decode a diff from a JSON string.
pub fn from_json_str(text: &str) -> DiffResult<Diff> {
    let json: Json = serde_json::from_str(text).map_err(|e| DiffError::Serialization(e.to_string()))?;
    decode(&json)
}

fn is_marker(object: &JsonMap<String, Json>) -> bool {
    object.len() == 1 && object.contains_key(REMOVED_KEY)
}

fn removed_payload(json: &Json) -> Option<&Json> {
    match json {
        Json::Object(object) if is_marker(object) => object.get(REMOVED_KEY),
        _ => None,
    }
}

/// `$removed` with one or more leading `$`.
fn is_escaped_form(key: &str) -> bool {
    key.starts_with('$') && key.trim_start_matches('$') == "removed"
}

fn escape_key(key: &str) -> String {
    if is_escaped_form(key) {
        format!("${key}")
    } else {
        key.to_owned()
    }
}

fn unescape_key(key: &str) -> String {
    match key.strip_prefix('$') {
        Some(rest) if is_escaped_form(rest) => rest.to_owned(),
        _ => key.to_owned(),
    }
}

/// Replacement data. Objects in it decode as nested diffs, so their keys
/// are escaped the same way; arrays decode as additions.
fn encode_data(value: &Value) -> DiffResult<Json> {
    match value {
        Value::Mapping(map) => map
            .iter()
            .map(|(key, value)| Ok((escape_key(key), encode_data(value)?)))
            .collect::<DiffResult<JsonMap<_, _>>>()
            .map(Json::Object),
        Value::Sequence(items) => items
            .iter()
            .map(encode_added)
            .collect::<DiffResult<Vec<_>>>()
            .map(Json::Array),
        Value::Scalar(_) => Ok(Json::try_from(value)?),
    }
}

/// Added elements decode verbatim.
fn encode_added(value: &Value) -> DiffResult<Json> {
    let json = Json::try_from(value)?;
    match &json {
        Json::Object(object) if is_marker(object) => Err(DiffError::ReservedKey),
        _ => Ok(json),
    }
}

/// Payloads of removal markers are read back verbatim, so they may hold
/// anything.
fn encode_removed(value: &Value) -> DiffResult<Json> {
    let mut object = JsonMap::new();
    object.insert(REMOVED_KEY.to_string(), Json::try_from(value)?);
    Ok(Json::Object(object))
}

fn decode_entry(json: &Json) -> DiffResult<DiffEntry> {
    if let Some(payload) = removed_payload(json) {
        return Ok(DiffEntry::Remove(Value::try_from(payload.clone())?));
    }
    match json {
        Json::Object(_) | Json::Array(_) => Ok(DiffEntry::Patch(decode(json)?)),
        scalar => Ok(DiffEntry::Replace(Value::try_from(scalar.clone())?)),
    }
}

fn decode_edit(json: &Json) -> DiffResult<SequenceEdit> {
    match removed_payload(json) {
        Some(payload) => Ok(SequenceEdit::Remove(Value::try_from(payload.clone())?)),
        None => Ok(SequenceEdit::Add(Value::try_from(json.clone())?)),
    }
}

impl Serialize for Diff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode(self).map_err(S::Error::custom)?.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Diff {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        decode(&json).map_err(D::Error::custom)
    }
}
