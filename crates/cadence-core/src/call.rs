//! Model-issued tool calls, before and after validation.

use crate::schema::HEARTBEAT_FIELD;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Coerced arguments handed to an executor.
pub type Arguments = Map<String, Value>;

/// A call exactly as the model produced it.
///
/// `arguments` is untyped; providers send it either as a JSON object or as
/// a JSON-encoded string, and both forms are accepted when deserializing.
/// Created per model turn and consumed immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,

    #[serde(default = "empty_object", deserialize_with = "object_or_encoded")]
    pub arguments: Value,

    /// Heartbeat flag supplied outside of `arguments`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_heartbeat: Option<bool>,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
            request_heartbeat: None,
        }
    }

    pub fn with_heartbeat(mut self, request_heartbeat: bool) -> Self {
        self.request_heartbeat = Some(request_heartbeat);
        self
    }

    /// Arguments to validate: `arguments` with the out-of-band heartbeat flag
    /// folded in, unless the arguments already carry one.
    pub fn effective_arguments(&self) -> Value {
        let mut arguments = self.arguments.clone();
        if let (Some(flag), Value::Object(map)) = (self.request_heartbeat, &mut arguments) {
            map.entry(HEARTBEAT_FIELD).or_insert(Value::Bool(flag));
        }
        arguments
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn object_or_encoded<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        // Left as a string when it does not decode; the validator rejects it.
        Value::String(encoded) => {
            Ok(serde_json::from_str(&encoded).unwrap_or(Value::String(encoded)))
        }
        Value::Null => Ok(empty_object()),
        other => Ok(other),
    }
}

/// A call whose arguments have been checked and coerced against the tool's
/// specification.
///
/// Only the validator can produce one, so holding a `ValidatedCall` is proof
/// that validation succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCall {
    tool: String,
    arguments: Arguments,
    request_heartbeat: bool,
}

impl ValidatedCall {
    pub(crate) fn new(tool: String, arguments: Arguments, request_heartbeat: bool) -> Self {
        Self {
            tool,
            arguments,
            request_heartbeat,
        }
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Coerced arguments, without the heartbeat flag.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// True only when the tool declares the heartbeat flag and the call set
    /// it to `true`.
    pub fn requests_heartbeat(&self) -> bool {
        self.request_heartbeat
    }
}
