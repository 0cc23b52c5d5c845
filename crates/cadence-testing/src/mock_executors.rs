//! # Mock Executors
//!
//! Executors that return predictable outcomes, keyed by the exact argument
//! object they receive.

use cadence_core::{Arguments, ExecutorError, Payload, ToolExecutor};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone)]
enum Outcome {
    Respond(Payload),
    Fail(ExecutorError),
    Panic(String),
}

impl Outcome {
    fn respond(value: Value) -> Self {
        match value {
            Value::Object(payload) => Outcome::Respond(payload),
            other => {
                let mut payload = Payload::new();
                payload.insert("value".into(), other);
                Outcome::Respond(payload)
            }
        }
    }

    fn run(&self) -> Result<Payload, ExecutorError> {
        match self {
            Outcome::Respond(payload) => Ok(payload.clone()),
            Outcome::Fail(err) => Err(err.clone()),
            Outcome::Panic(message) => panic!("{}", message),
        }
    }
}

/// A mock executor with canned outcomes and call tracking.
///
/// Clones share their call history.
#[derive(Debug, Clone)]
pub struct MockExecutor {
    name: String,
    responses: Vec<(Arguments, Outcome)>,
    default_outcome: Option<Outcome>,
    call_history: Arc<Mutex<Vec<Arguments>>>,
}

impl MockExecutor {
    /// Create a mock for `name` that echoes its arguments when nothing else
    /// matches.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Vec::new(),
            default_outcome: None,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Respond with `payload` when called with exactly `arguments`.
    ///
    /// A payload that is not an object is wrapped as `{"value": payload}`.
    pub fn with_response(mut self, arguments: Value, payload: Value) -> Self {
        self.responses
            .push((as_arguments(arguments), Outcome::respond(payload)));
        self
    }

    /// Fail with `error` when called with exactly `arguments`.
    pub fn with_failure(mut self, arguments: Value, error: ExecutorError) -> Self {
        self.responses
            .push((as_arguments(arguments), Outcome::Fail(error)));
        self
    }

    pub fn with_default_response(mut self, payload: Value) -> Self {
        self.default_outcome = Some(Outcome::respond(payload));
        self
    }

    pub fn with_default_failure(mut self, error: ExecutorError) -> Self {
        self.default_outcome = Some(Outcome::Fail(error));
        self
    }

    /// Panic with `message` on every unmatched call.
    pub fn with_default_panic(mut self, message: impl Into<String>) -> Self {
        self.default_outcome = Some(Outcome::Panic(message.into()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.history().len()
    }

    pub fn call_history(&self) -> Vec<Arguments> {
        self.history().to_vec()
    }

    pub fn was_called_with(&self, arguments: &Value) -> bool {
        match arguments.as_object() {
            Some(expected) => self.history().iter().any(|call| call == expected),
            None => false,
        }
    }

    pub fn reset(&self) {
        self.history().clear();
    }

    fn history(&self) -> std::sync::MutexGuard<'_, Vec<Arguments>> {
        self.call_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn as_arguments(value: Value) -> Arguments {
    match value {
        Value::Object(map) => map,
        _ => Arguments::new(),
    }
}

impl ToolExecutor for MockExecutor {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        self.history().push(arguments.clone());

        if let Some((_, outcome)) = self.responses.iter().find(|(args, _)| args == arguments) {
            return outcome.run();
        }
        match &self.default_outcome {
            Some(outcome) => outcome.run(),
            None => {
                let mut payload = Payload::new();
                payload.insert("echo".into(), Value::Object(arguments.clone()));
                Ok(payload)
            }
        }
    }
}
