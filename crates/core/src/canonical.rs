//! Canonical JSON helpers
//!
//! Serializes structures with recursively sorted object keys so that the
//! model artifact can be hashed and compared across runs and platforms.

use serde::{ser::Error as SerdeSerError, Serialize};
use serde_json::{map::Map, Serializer, Value};
use std::io::Write;

/// Recursively sort object keys to obtain a canonical representation.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            let mut sorted = Map::with_capacity(entries.len());
            for (key, val) in entries {
                sorted.insert(key, canonicalize(val));
            }

            Value::Object(sorted)
        }
        Value::Array(elements) => Value::Array(elements.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serialize a value as canonical JSON into the provided writer.
pub fn write_canonical_json<T, W>(writer: W, value: &T) -> Result<(), serde_json::Error>
where
    T: Serialize,
    W: Write,
{
    let canonical_value = canonicalize(serde_json::to_value(value)?);
    let mut serializer = Serializer::new(writer);
    canonical_value.serialize(&mut serializer)?;
    Ok(())
}

/// Serialize a value as a canonical JSON string.
pub fn canonical_json_string<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: Serialize,
{
    let mut buffer = Vec::new();
    write_canonical_json(&mut buffer, value)?;
    String::from_utf8(buffer).map_err(|err| SerdeSerError::custom(err.to_string()))
}
