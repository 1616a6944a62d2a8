//! Structured before/after payloads captured by the audit trail.
//!
//! A snapshot is a caller-selected subset of an entity's fields at one instant.
//! The audit trail never interprets its shape; it only stores and returns it.
//! The stored text form is compact JSON with object keys in sorted order, so two
//! snapshots of the same fields diff line-for-line regardless of how the caller
//! built them. Integers and floats stay distinct across a round trip.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CoreError;

/// Point-in-time field capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Snapshot(Value);

impl Snapshot {
    /// Capture any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the value cannot be represented as JSON
    /// (e.g. a map with non-string keys).
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, CoreError> {
        serde_json::to_value(value)
            .map(Self)
            .map_err(|e| CoreError::Validation(format!("snapshot is not serializable: {e}")))
    }

    /// Parse a snapshot from its stored text form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the text is not valid JSON.
    pub fn from_json(s: &str) -> Result<Self, CoreError> {
        serde_json::from_str(s)
            .map(Self)
            .map_err(|e| CoreError::Validation(format!("invalid snapshot JSON: {e}")))
    }

    /// Encode to the stored text form: compact JSON, keys sorted at every level.
    #[must_use]
    pub fn to_json(&self) -> String {
        canonicalize(&self.0).to_string()
    }

    /// Decode into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        serde_json::from_value(self.0.clone())
            .map_err(|e| CoreError::Validation(format!("snapshot does not match type: {e}")))
    }

    /// Look up a top-level field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for Snapshot {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Rebuild every object with its keys inserted in sorted order.
///
/// Works whether or not `serde_json` was built with `preserve_order`.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
