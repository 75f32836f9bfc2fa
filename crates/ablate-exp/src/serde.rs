use std::collections::BTreeMap;
use std::iter::FromIterator;

use ablate_core::errors::{AblateError, ErrorInfo};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::error::Category;
use serde_json::{Map, Value};

fn serde_error(code: &str, err: impl ToString) -> AblateError {
    AblateError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Maps a JSON decoding failure onto the error taxonomy: well-formed input
/// that violates the schema or a model invariant is a validation error,
/// anything else is a malformed document.
pub(crate) fn json_decode_error(code: &str, err: serde_json::Error) -> AblateError {
    match err.classify() {
        Category::Data => AblateError::Validation(ErrorInfo::new(code, err.to_string())),
        Category::Io | Category::Syntax | Category::Eof => serde_error(code, err),
    }
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => {
            let canonical_values = values.into_iter().map(canonicalize).collect();
            Value::Array(canonical_values)
        }
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with deterministic ordering.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, AblateError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json_serialize", err))?;
    let canonical = canonicalize(value);
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonical).map_err(|err| serde_error("json_write", err))?;
    Ok(bytes)
}

/// Serializes a value into indented JSON, keeping field order.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, AblateError> {
    serde_json::to_string_pretty(value).map_err(|err| serde_error("json_serialize", err))
}

/// Deserializes a value from JSON bytes.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, AblateError> {
    serde_json::from_slice(data).map_err(|err| json_decode_error("json_deserialize", err))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_str<T: DeserializeOwned>(data: &str) -> Result<T, AblateError> {
    serde_yaml::from_str(data).map_err(|err| serde_error("yaml_deserialize", err))
}
