//! Variable environment shared across a chain run.
//!
//! The environment is a process-wide mapping from variable name to value.
//! It is written by response extraction (or an explicit `set`) and read by
//! template substitution. Later writes overwrite earlier ones; there is no
//! versioning or rollback. A chain aborted mid-run leaves the variables it
//! already extracted in place, which is intentional: partial progress stays
//! visible for debugging.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A variable value with explicit serialization rules.
///
/// Scalars keep their natural string form when substituted into a template;
/// structured values (objects, arrays, null) are serialized to compact JSON
/// text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    /// Plain text, substituted verbatim.
    Text(String),

    /// Numeric value; integers render without a decimal point.
    Number(serde_json::Number),

    /// Boolean value, rendered as `true` / `false`.
    Bool(bool),

    /// Structured JSON (object, array, or null), rendered as compact JSON.
    Json(JsonValue),
}

impl VarValue {
    /// Converts a decoded JSON value into a VarValue.
    ///
    /// Scalar JSON values map to the scalar variants; objects, arrays, and
    /// null stay structured.
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::String(s) => VarValue::Text(s),
            JsonValue::Number(n) => VarValue::Number(n),
            JsonValue::Bool(b) => VarValue::Bool(b),
            other => VarValue::Json(other),
        }
    }

    /// Produces the substitution form of this value.
    ///
    /// Text passes through unchanged; numbers and booleans use their
    /// natural string form; structured values serialize to compact JSON.
    pub fn render(&self) -> String {
        match self {
            VarValue::Text(s) => s.clone(),
            VarValue::Number(n) => n.to_string(),
            VarValue::Bool(b) => b.to_string(),
            VarValue::Json(v) => v.to_string(),
        }
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::Text(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::Text(s)
    }
}

impl From<i64> for VarValue {
    fn from(n: i64) -> Self {
        VarValue::Number(n.into())
    }
}

impl From<u64> for VarValue {
    fn from(n: u64) -> Self {
        VarValue::Number(n.into())
    }
}

impl From<f64> for VarValue {
    fn from(n: f64) -> Self {
        match serde_json::Number::from_f64(n) {
            Some(num) => VarValue::Number(num),
            // NaN and infinities have no JSON form; keep the display text.
            None => VarValue::Text(n.to_string()),
        }
    }
}

impl From<bool> for VarValue {
    fn from(b: bool) -> Self {
        VarValue::Bool(b)
    }
}

impl From<JsonValue> for VarValue {
    fn from(value: JsonValue) -> Self {
        VarValue::from_json(value)
    }
}

/// Mapping of variable name to value, shared across the steps of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableEnvironment {
    #[serde(default)]
    variables: HashMap<String, VarValue>,
}

impl VariableEnvironment {
    /// Creates a new empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable, overwriting any prior binding.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<VarValue>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Gets a variable value by name.
    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.variables.get(name)
    }

    /// Checks if a variable is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Removes a single binding, returning its value if present.
    pub fn remove(&mut self, name: &str) -> Option<VarValue> {
        self.variables.remove(name)
    }

    /// Removes every binding.
    pub fn clear(&mut self) {
        self.variables.clear();
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Checks if the environment has no bindings.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Returns all bound names, sorted for stable listing.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}
