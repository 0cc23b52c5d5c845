//! # Error Types
//!
//! Errors are split by the point at which they can occur:
//!
//! - [`SchemaError`] is raised while the registry is being built, before any
//!   tool runs. It is a configuration fault for the integrator.
//! - [`ValidationError`] is raised before dispatch and is surfaced to the
//!   model as a structured rejection so it can retry.
//! - [`ConfigError`] covers loading of the TOML configuration.
//!
//! Collaborator failures never appear here: they are normalized into
//! [`crate::ToolExecutionResult::Failure`] at the dispatch boundary.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Faults in the tool catalog itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Tool '{name}' is already registered")]
    DuplicateToolName { name: String },

    #[error("Unknown tool: '{name}'")]
    UnknownTool { name: String },

    #[error("Tool '{tool}' lists required field '{field}' which is not a declared property")]
    UnknownRequiredField { tool: String, field: String },

    #[error("Tool '{tool}' declares property '{property}' more than once")]
    DuplicateProperty { tool: String, property: String },

    #[error("Invalid tool name '{name}': names must be non-empty and contain no whitespace")]
    InvalidToolName { name: String },
}

/// The type a rejected argument was expected to coerce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedType {
    String,
    Integer,
    NonNegativeInteger,
    Boolean,
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedType::String => write!(f, "string"),
            ExpectedType::Integer => write!(f, "integer"),
            ExpectedType::NonNegativeInteger => write!(f, "non-negative integer"),
            ExpectedType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Rejection of a model-issued call. Produced before any side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field '{field}'")]
    MissingRequiredField { field: String },

    #[error("Field '{field}' must be of type {expected}")]
    InvalidType { field: String, expected: ExpectedType },

    #[error("Arguments must be a JSON object")]
    NotAnObject,
}

impl ValidationError {
    /// Short machine-readable tag for the rejection.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredField { .. } => "missing_required_field",
            ValidationError::InvalidType { .. } => "invalid_type",
            ValidationError::NotAnObject => "not_an_object",
        }
    }

    /// Name of the offending field, if the error concerns one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingRequiredField { field }
            | ValidationError::InvalidType { field, .. } => Some(field),
            ValidationError::NotAnObject => None,
        }
    }

    /// Structured rejection handed back to the model.
    pub fn to_rejection(&self) -> serde_json::Value {
        let mut rejection = serde_json::json!({
            "ok": false,
            "error": self.to_string(),
            "kind": self.kind(),
        });
        if let Some(field) = self.field() {
            rejection["field"] = serde_json::Value::String(field.to_string());
        }
        if let ValidationError::InvalidType { expected, .. } = self {
            rejection["expected"] = serde_json::Value::String(expected.to_string());
        }
        rejection
    }
}

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Invalid tool specification in configuration: {0}")]
    Schema(#[from] SchemaError),
}

/// Umbrella error for integrators that drive several components at once.
#[derive(Debug, Error)]
pub enum CadenceError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type CadenceResult<T> = Result<T, CadenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_rejection_carries_field_and_kind() {
        let err = ValidationError::MissingRequiredField {
            field: "issue_key".into(),
        };
        let rejection = err.to_rejection();

        assert_eq!(rejection["ok"], false);
        assert_eq!(rejection["kind"], "missing_required_field");
        assert_eq!(rejection["field"], "issue_key");
        assert_eq!(rejection["error"], "Missing required field 'issue_key'");
    }

    #[test]
    fn invalid_type_rejection_names_expected_type() {
        let err = ValidationError::InvalidType {
            field: "page".into(),
            expected: ExpectedType::NonNegativeInteger,
        };
        let rejection = err.to_rejection();

        assert_eq!(rejection["expected"], "non-negative integer");
        assert_eq!(err.to_string(), "Field 'page' must be of type non-negative integer");
    }

    #[test]
    fn not_an_object_has_no_field() {
        let rejection = ValidationError::NotAnObject.to_rejection();
        assert!(rejection.get("field").is_none());
    }

    #[test]
    fn schema_error_converts_into_umbrella() {
        let err: CadenceError = SchemaError::UnknownTool {
            name: "nope".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Unknown tool: 'nope'");
    }
}
