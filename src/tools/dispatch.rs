//! Dispatch / validation protocol
//!
//! The generic validate-then-invoke procedure applied uniformly to every
//! tool. Each declared parameter is coerced to its declared type once,
//! here, so tool bodies receive already-typed values instead of performing
//! per-field type assertions. Unknown extra keys are tolerated and ride
//! along in the raw bag.

use crate::errors::{Result, ToolError};
use crate::tools::types::{ParamSpec, ParamType, ParamValue, Tool, ToolArgs};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Validate the raw parameter bag against the tool's schema, then execute
pub async fn invoke(tool: &dyn Tool, params: Map<String, Value>) -> Result<Value> {
    let args = validate(&tool.parameters(), params)?;
    tool.execute(args).await
}

/// Build a typed parameter bag from a raw one.
///
/// Missing required parameters short-circuit before any tool-specific
/// logic runs; declared defaults are filled in; supplied values must match
/// their declared type. JSON `null` counts as absent.
pub fn validate(specs: &[ParamSpec], params: Map<String, Value>) -> Result<ToolArgs> {
    let mut values = HashMap::new();

    for spec in specs {
        let supplied = params.get(&spec.name).filter(|value| !value.is_null());
        match supplied {
            Some(value) => {
                values.insert(spec.name.clone(), coerce(spec, value)?);
            }
            None => {
                if let Some(default) = &spec.default {
                    values.insert(spec.name.clone(), coerce(spec, default)?);
                } else if spec.required {
                    return Err(ToolError::MissingParameter(spec.name.clone()));
                }
            }
        }
    }

    Ok(ToolArgs::new(values, params))
}

fn coerce(spec: &ParamSpec, value: &Value) -> Result<ParamValue> {
    let mismatch = |expected: &str| ToolError::InvalidParameter {
        name: spec.name.clone(),
        reason: format!("expected {expected}, got {value}"),
    };

    match spec.param_type {
        ParamType::String => value
            .as_str()
            .map(|s| ParamValue::String(s.to_string()))
            .ok_or_else(|| mismatch("a string")),
        ParamType::Integer => match value {
            // JSON decoders hand numeric parameters over as floats; accept
            // them as integers when they carry no fractional part.
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(ParamValue::Integer)
                .ok_or_else(|| mismatch("an integer")),
            _ => Err(mismatch("an integer")),
        },
        ParamType::Boolean => value
            .as_bool()
            .map(ParamValue::Boolean)
            .ok_or_else(|| mismatch("a boolean")),
        ParamType::Float => value
            .as_f64()
            .map(ParamValue::Float)
            .ok_or_else(|| mismatch("a number")),
    }
}
