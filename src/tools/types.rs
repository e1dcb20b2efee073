//! Tool contract types
//!
//! The uniform surface every capability exposes: an immutable descriptor,
//! a fixed parameter schema, and an async execution entry point taking a
//! typed parameter bag.

use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Immutable tool metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Globally unique identity
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub category: String,
}

/// Fixed enumeration of declarable parameter types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
    Float,
}

/// One entry of a tool's parameter schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub param_type: ParamType,

    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    pub description: String,
}

impl ParamSpec {
    pub fn required(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            default: None,
            description: description.into(),
        }
    }

    pub fn optional(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: false,
            default: None,
            description: description.into(),
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A parameter value coerced to its declared type
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Float(f64),
}

/// Typed parameter bag produced by dispatch validation.
///
/// Declared parameters are available through the typed accessors; the raw
/// bag rides along untouched so undeclared extra keys stay visible.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    values: HashMap<String, ParamValue>,
    raw: Map<String, Value>,
}

impl ToolArgs {
    pub(crate) fn new(values: HashMap<String, ParamValue>, raw: Map<String, Value>) -> Self {
        Self { values, raw }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ParamValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ParamValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ParamValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ParamValue::Float(f)) => Some(*f),
            _ => None,
        }
    }

    /// The full, unfiltered parameter bag as supplied by the caller
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

/// A self-describing capability unit.
///
/// Implementations are self-contained: no tool holds a reference to
/// another, and each only reads the configuration handed to it at
/// construction.
#[async_trait]
pub trait Tool: Send + Sync + std::fmt::Debug {
    /// Immutable metadata identifying the tool
    fn descriptor(&self) -> ToolDescriptor;

    /// The tool's parameter schema, fixed at compile time
    fn parameters(&self) -> Vec<ParamSpec>;

    /// Execute with an already-validated parameter bag
    async fn execute(&self, args: ToolArgs) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_spec_builders() {
        let spec = ParamSpec::optional("timeout", ParamType::Integer, "Timeout in seconds")
            .with_default(json!(30));

        assert_eq!(spec.name, "timeout");
        assert!(!spec.required);
        assert_eq!(spec.default, Some(json!(30)));
    }

    #[test]
    fn test_param_spec_serialization() {
        let spec = ParamSpec::required("command", ParamType::String, "Command to execute");
        let value = serde_json::to_value(&spec).unwrap();

        assert_eq!(value["type"], "string");
        assert_eq!(value["required"], true);
        // No default declared, so the key is omitted entirely
        assert!(value.get("default").is_none());
    }

    #[test]
    fn test_tool_args_accessors() {
        let mut values = HashMap::new();
        values.insert("path".to_string(), ParamValue::String("/tmp".to_string()));
        values.insert("timeout".to_string(), ParamValue::Integer(30));
        values.insert("recursive".to_string(), ParamValue::Boolean(true));

        let args = ToolArgs::new(values, Map::new());

        assert_eq!(args.get_str("path"), Some("/tmp"));
        assert_eq!(args.get_i64("timeout"), Some(30));
        assert_eq!(args.get_bool("recursive"), Some(true));
        assert_eq!(args.get_str("timeout"), None);
        assert!(args.get("missing").is_none());
    }

    #[test]
    fn test_descriptor_serialization() {
        let descriptor = ToolDescriptor {
            id: "scheduler".to_string(),
            name: "Task Scheduler".to_string(),
            description: "Manage tasks and schedules".to_string(),
            version: "1.0.0".to_string(),
            category: "Productivity".to_string(),
        };

        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["id"], "scheduler");
        assert_eq!(value["category"], "Productivity");
    }
}
