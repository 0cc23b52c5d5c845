//! Outcomes of tool execution.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Success payload returned by an executor.
pub type Payload = Map<String, Value>;

/// Failure raised by an external collaborator.
///
/// The display form is the bare message, since it is what the model sees in
/// the `error` field of a failed result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// Requested resource (issue, board, file...) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Arguments passed validation but the collaborator cannot use them.
    #[error("{0}")]
    InvalidInput(String),

    /// Transport-level failure talking to a remote system.
    #[error("{0}")]
    Network(String),

    /// The remote system answered with an error.
    #[error("{0}")]
    Remote(String),

    /// Local I/O failure.
    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

impl ExecutorError {
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutorError::NotFound(_) => "not_found",
            ExecutorError::InvalidInput(_) => "invalid_input",
            ExecutorError::Network(_) => "network",
            ExecutorError::Remote(_) => "remote",
            ExecutorError::Io(_) => "io",
            ExecutorError::Other(_) => "other",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ExecutorError::NotFound(m)
            | ExecutorError::InvalidInput(m)
            | ExecutorError::Network(m)
            | ExecutorError::Remote(m)
            | ExecutorError::Io(m)
            | ExecutorError::Other(m) => m,
        }
    }
}

impl From<std::io::Error> for ExecutorError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ExecutorError::NotFound(err.to_string()),
            _ => ExecutorError::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ExecutorError {
    fn from(err: serde_json::Error) -> Self {
        ExecutorError::InvalidInput(err.to_string())
    }
}

/// Normalized outcome of a dispatched call.
///
/// Serializes to `{"ok": true, "result": {...}}` or
/// `{"ok": false, "error": "..."}`. A failure message is never empty.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolExecutionResult {
    Success { result: Payload },
    Failure { error: String },
}

impl ToolExecutionResult {
    pub fn success(result: Payload) -> Self {
        ToolExecutionResult::Success { result }
    }

    /// Build a failure, substituting a generic message for an empty one.
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "tool failed without an error message".to_string()
        } else {
            error
        };
        ToolExecutionResult::Failure { error }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ToolExecutionResult::Failure { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ToolExecutionResult::Success { .. } => None,
            ToolExecutionResult::Failure { error } => Some(error),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ToolExecutionResult::Success { result } => json!({ "ok": true, "result": result }),
            ToolExecutionResult::Failure { error } => json!({ "ok": false, "error": error }),
        }
    }
}

impl Serialize for ToolExecutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ToolExecutionResult", 2)?;
        match self {
            ToolExecutionResult::Success { result } => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("result", result)?;
            }
            ToolExecutionResult::Failure { error } => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}
