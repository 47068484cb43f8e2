//! Canonical shape for upstream search results.

use serde_json::Value;

/// Normalizes an upstream search payload into a flat list of result objects.
///
/// The upstream returns either a bare array or an object with a `results`
/// array. Any other shape is treated as "no results".
#[must_use]
pub fn normalize_search_results(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
