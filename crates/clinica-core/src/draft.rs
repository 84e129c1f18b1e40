//! The draft record edited by a wizard session.
//!
//! A draft is a plain JSON object holding every field any step touches.
//! Values stay loosely typed until the submission adapter maps them into a
//! payload, so a half-typed form never fails to deserialize.
//!
//! JSON has no `undefined`; inside a partial update a `null` value means
//! "remove this key" and is never stored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft(Map<String, Value>);

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a draft from an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(CoreError::NotAnObject),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Merge a partial object into the draft. Returns the field paths that
    /// were touched, see [`merge_one_level`].
    pub fn merge(&mut self, patch: Map<String, Value>) -> Vec<String> {
        merge_one_level(&mut self.0, patch)
    }

    /// Look up a dot-separated field path. Numeric segments index arrays.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// The trimmed string at `path`, or `None` when absent or blank.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_path(path)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The number at `path`. Numeric strings (as produced by form inputs)
    /// are accepted.
    pub fn get_number(&self, path: &str) -> Option<f64> {
        self.get_path(path).and_then(numeric_value)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_path(path).and_then(Value::as_bool)
    }
}

impl From<Map<String, Value>> for Draft {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Interpret a JSON value as a number. Blank strings are treated as absent.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// True when the value carries no user input: `null`, a blank string or an
/// empty array.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Merge `patch` into `target`, one level deep.
///
/// For each top-level key:
/// - `null` removes the key;
/// - an object merged into an existing object is merged key by key, where a
///   nested `null` removes the nested key and any other nested value
///   replaces it wholesale; an object holding only `null`s never creates
///   or replaces the entry;
/// - anything else replaces the stored value.
///
/// Returns the touched field paths (`key` or `key.nested`) in patch order,
/// which the wizard uses to clear errors for exactly those fields.
pub fn merge_one_level(target: &mut Map<String, Value>, patch: Map<String, Value>) -> Vec<String> {
    let mut touched = Vec::with_capacity(patch.len());

    for (key, value) in patch {
        match value {
            Value::Null => {
                target.remove(&key);
                touched.push(key);
            }
            Value::Object(nested) => {
                if nested.is_empty() {
                    touched.push(key.clone());
                } else if nested.values().all(Value::is_null)
                    && !target.get(&key).is_some_and(Value::is_object)
                {
                    // Nothing to remove and nothing to store.
                    touched.extend(nested.keys().map(|nested_key| format!("{key}.{nested_key}")));
                    continue;
                }
                let entry = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !entry.is_object() {
                    *entry = Value::Object(Map::new());
                }
                if let Value::Object(existing) = entry {
                    for (nested_key, nested_value) in nested {
                        touched.push(format!("{key}.{nested_key}"));
                        if nested_value.is_null() {
                            existing.remove(&nested_key);
                        } else {
                            existing.insert(nested_key, nested_value);
                        }
                    }
                }
            }
            other => {
                target.insert(key.clone(), other);
                touched.push(key);
            }
        }
    }

    touched
}
