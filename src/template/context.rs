//! Template context assembly
//!
//! Merges the entity a capability was invoked on with the call's arguments
//! into one flat name → text mapping. Arguments win over entity attributes
//! of the same name. Composite values are embedded as compact JSON.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Attributes of the entity instance the capability was invoked on
pub type SourceEntity = Map<String, Value>;

/// Arguments supplied with one capability invocation
pub type CallArguments = Map<String, Value>;

/// Flat placeholder → value mapping for one call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `source` and `args`; same-named arguments override attributes
    pub fn assemble(source: &SourceEntity, args: &CallArguments) -> Self {
        let mut context = Self::new();
        for (key, value) in source.iter().chain(args.iter()) {
            context.insert(key.clone(), value);
        }
        context
    }

    pub fn insert(&mut self, key: impl Into<String>, value: &Value) {
        self.values.insert(key.into(), value_to_text(value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.values
    }
}

/// Convenience wrapper around [`TemplateContext::assemble`]
pub fn assemble(source: &SourceEntity, args: &CallArguments) -> TemplateContext {
    TemplateContext::assemble(source, args)
}

/// Text form of a value as placed into a template context
///
/// Strings pass through unquoted; numbers, booleans and null use their JSON
/// spelling; arrays and objects become compact JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        composite @ (Value::Array(_) | Value::Object(_)) => composite.to_string(),
    }
}
