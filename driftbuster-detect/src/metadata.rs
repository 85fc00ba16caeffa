//! Central metadata normaliser.
//!
//! Every `DetectionMatch::metadata` value passes through here before the
//! match leaves the orchestrator: keys are trimmed, enum-like keys are
//! lowercased, and values that cannot round-trip through JSON are dropped
//! rather than panicking the scan.

use std::collections::BTreeMap;

use serde_json::Value;

/// Keys whose values are treated as enum-like and lowercased if they are
/// plain JSON strings (format/variant/encoding style fields).
const ENUM_LIKE_KEYS: &[&str] = &["variant", "encoding", "top_level_type"];

/// Normalise a metadata map in place: trim key whitespace, lowercase
/// known enum-like string values, and drop values that are not
/// JSON-serialisable (NaN/Infinity floats — everything else `serde_json`
/// produces is already representable).
pub fn normalise(metadata: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    metadata
        .into_iter()
        .filter_map(|(key, value)| {
            let key = key.trim().to_string();
            if key.is_empty() {
                return None;
            }
            if !is_json_representable(&value) {
                return None;
            }
            let value = if ENUM_LIKE_KEYS.contains(&key.as_str()) {
                lowercase_if_string(value)
            } else {
                value
            };
            Some((key, value))
        })
        .collect()
}

fn lowercase_if_string(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other,
    }
}

fn is_json_representable(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite()) || n.is_i64() || n.is_u64(),
        Value::Array(items) => items.iter().all(is_json_representable),
        Value::Object(map) => map.values().all(is_json_representable),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_empty_keys() {
        let mut input = BTreeMap::new();
        input.insert("  foo  ".to_string(), Value::String("bar".to_string()));
        input.insert("   ".to_string(), Value::Bool(true));
        let out = normalise(input);
        assert_eq!(out.len(), 1);
        assert!(out.contains_key("foo"));
    }

    #[test]
    fn lowercases_enum_like_values() {
        let mut input = BTreeMap::new();
        input.insert("variant".to_string(), Value::String("Java-Properties".to_string()));
        let out = normalise(input);
        assert_eq!(out["variant"], Value::String("java-properties".to_string()));
    }

    #[test]
    fn keeps_finite_numbers_and_nested_values() {
        let mut input = BTreeMap::new();
        input.insert("bytes_sampled".to_string(), Value::Number(31.into()));
        input.insert(
            "top_level_keys".to_string(),
            Value::Array(vec![Value::String("Logging".to_string())]),
        );
        let out = normalise(input);
        assert_eq!(out.len(), 2);
    }
}
