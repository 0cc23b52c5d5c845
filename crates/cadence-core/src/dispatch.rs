//! # Dispatch Boundary
//!
//! Routes a [`ValidatedCall`] to its executor and normalizes whatever comes
//! back. Nothing raised by a collaborator gets past this point: returned
//! errors and panics alike become [`ToolExecutionResult::Failure`], so one
//! broken tool cannot abort the step loop.

use crate::call::ValidatedCall;
use crate::executor::ExecutorTable;
use crate::result::ToolExecutionResult;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Execute `call` with the matching executor from `executors`.
///
/// No timeout is applied; an executor that blocks holds up the step until it
/// returns.
pub fn dispatch(call: &ValidatedCall, executors: &ExecutorTable) -> ToolExecutionResult {
    let tool = call.tool();

    let Some(executor) = executors.get(tool) else {
        tracing::warn!(tool = %tool, "No executor registered for tool");
        return ToolExecutionResult::failure(format!("No executor registered for tool '{}'", tool));
    };

    tracing::debug!(tool = %tool, arguments = call.arguments().len(), "Dispatching tool call");

    let outcome = catch_unwind(AssertUnwindSafe(|| executor.execute(call.arguments())));

    match outcome {
        Ok(Ok(payload)) => {
            tracing::debug!(tool = %tool, "Tool call succeeded");
            ToolExecutionResult::success(payload)
        }
        Ok(Err(err)) => {
            tracing::warn!(tool = %tool, kind = err.kind(), error = %err, "Tool call failed");
            ToolExecutionResult::failure(non_empty(tool, err.to_string()))
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(tool = %tool, error = %message, "Tool executor panicked");
            ToolExecutionResult::failure(non_empty(tool, message))
        }
    }
}

fn non_empty(tool: &str, message: String) -> String {
    if message.trim().is_empty() {
        format!("tool '{}' failed without an error message", tool)
    } else {
        message
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "tool executor panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::Arguments;
    use crate::executor::{ArgumentsExt, ToolExecutor};
    use crate::result::{ExecutorError, Payload};
    use crate::schema::{PropertyType, ToolSpecification};
    use crate::validation::validate;
    use serde_json::json;
    use std::sync::Arc;

    struct Outcome {
        name: &'static str,
        behaviour: Behaviour,
    }

    enum Behaviour {
        Succeed,
        Fail(ExecutorError),
        Panic,
    }

    impl ToolExecutor for Outcome {
        fn name(&self) -> &str {
            self.name
        }

        fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
            match &self.behaviour {
                Behaviour::Succeed => {
                    let mut payload = Payload::new();
                    payload.insert("key".into(), json!(arguments.required_str("issue_key")?));
                    Ok(payload)
                }
                Behaviour::Fail(err) => Err(err.clone()),
                Behaviour::Panic => panic!("connection pool poisoned"),
            }
        }
    }

    fn call() -> ValidatedCall {
        let spec = ToolSpecification::builder("get_jira", "")
            .property("issue_key", PropertyType::String, "")
            .required("issue_key")
            .with_heartbeat()
            .build();
        validate(&spec, &json!({ "issue_key": "KMS-1", "request_heartbeat": true }))
            .expect("valid")
    }

    fn table(behaviour: Behaviour) -> ExecutorTable {
        ExecutorTable::new().with_executor(Arc::new(Outcome {
            name: "get_jira",
            behaviour,
        }))
    }

    #[test]
    fn success_is_wrapped() {
        let result = dispatch(&call(), &table(Behaviour::Succeed));
        assert_eq!(result.to_json(), json!({ "ok": true, "result": { "key": "KMS-1" } }));
    }

    #[test]
    fn executor_error_becomes_failure() {
        let result = dispatch(
            &call(),
            &table(Behaviour::Fail(ExecutorError::NotFound(
                "Issue Does Not Exist".into(),
            ))),
        );
        assert_eq!(
            result,
            ToolExecutionResult::Failure {
                error: "Issue Does Not Exist".into()
            }
        );
    }

    #[test]
    fn empty_error_message_is_named() {
        let failing = table(Behaviour::Fail(ExecutorError::Other(String::new())));
        let result = dispatch(&call(), &failing);
        assert_eq!(
            result.error_message(),
            Some("tool 'get_jira' failed without an error message")
        );
    }

    #[test]
    fn panic_is_contained() {
        let result = dispatch(&call(), &table(Behaviour::Panic));
        assert_eq!(result.error_message(), Some("connection pool poisoned"));
    }

    #[test]
    fn missing_executor_is_a_failure() {
        let result = dispatch(&call(), &ExecutorTable::new());
        assert_eq!(
            result.error_message(),
            Some("No executor registered for tool 'get_jira'")
        );
    }
}
