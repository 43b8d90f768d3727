//! Container-facing binding collector
//!
//! The dependency-injection container lives outside this crate. `Binder` is
//! the narrow surface modules write to: an insertion-ordered map from binding
//! key to value in which a later `bind` replaces an earlier one.

use indexmap::IndexMap;
use serde_json::Value;

/// Bindings contributed by modules, in first-bound order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binder {
    bindings: IndexMap<String, Value>,
}

impl Binder {
    /// Create an empty binder
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `value`, replacing any previous binding for `key`.
    ///
    /// A replaced key keeps its original position.
    pub fn bind(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.bindings.insert(key.into(), value.into());
        self
    }

    /// Get the current binding for `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.bindings.get(key)
    }

    /// Get the current binding for `key` as a string slice
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate bindings in first-bound order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}
