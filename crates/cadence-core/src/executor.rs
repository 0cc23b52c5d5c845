use crate::call::Arguments;
use crate::registry::ToolRegistry;
use crate::result::{ExecutorError, Payload};
use std::collections::HashMap;
use std::sync::Arc;

/// An external collaborator that carries out one tool.
///
/// Executors receive arguments that already passed validation, so every
/// declared argument has its declared primitive type. Failures are returned
/// as [`ExecutorError`]; the dispatcher turns them (and panics) into
/// failed results.
///
/// # Example
///
/// ```rust
/// use cadence_core::{Arguments, ArgumentsExt, ExecutorError, Payload, ToolExecutor};
/// use serde_json::json;
///
/// struct EchoExecutor;
///
/// impl ToolExecutor for EchoExecutor {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
///         let text = arguments.required_str("text")?;
///         let mut payload = Payload::new();
///         payload.insert("echo".into(), json!(text));
///         Ok(payload)
///     }
/// }
/// ```
pub trait ToolExecutor: Send + Sync {
    /// Name of the tool this executor serves.
    fn name(&self) -> &str;

    /// Run the tool with coerced arguments.
    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError>;
}

/// Typed access to coerced arguments.
pub trait ArgumentsExt {
    fn required_str(&self, name: &str) -> Result<&str, ExecutorError>;
    fn optional_str(&self, name: &str) -> Option<&str>;
    fn required_i64(&self, name: &str) -> Result<i64, ExecutorError>;
    fn optional_i64(&self, name: &str) -> Option<i64>;
    fn optional_bool(&self, name: &str) -> Option<bool>;
}

impl ArgumentsExt for Arguments {
    fn required_str(&self, name: &str) -> Result<&str, ExecutorError> {
        self.optional_str(name).ok_or_else(|| missing(name))
    }

    fn optional_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    fn required_i64(&self, name: &str) -> Result<i64, ExecutorError> {
        self.optional_i64(name).ok_or_else(|| missing(name))
    }

    fn optional_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| v.as_i64())
    }

    fn optional_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|v| v.as_bool())
    }
}

fn missing(name: &str) -> ExecutorError {
    ExecutorError::InvalidInput(format!("missing argument '{}'", name))
}

/// Name-indexed executors consulted by the dispatcher.
///
/// Cloning is cheap: executors are shared through `Arc`, so one table can be
/// built at startup and handed to every session.
#[derive(Clone, Default)]
pub struct ExecutorTable {
    executors: HashMap<String, Arc<dyn ToolExecutor>>,
}

impl ExecutorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an executor under its own name, replacing any previous one.
    pub fn with_executor(mut self, executor: Arc<dyn ToolExecutor>) -> Self {
        self.insert(executor);
        self
    }

    /// Insert an executor, returning the one it replaced.
    pub fn insert(&mut self, executor: Arc<dyn ToolExecutor>) -> Option<Arc<dyn ToolExecutor>> {
        self.executors.insert(executor.name().to_string(), executor)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolExecutor>> {
        self.executors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.executors.contains_key(name)
    }

    /// Registered tools that have no executor in this table.
    pub fn missing_for<'a>(&self, registry: &'a ToolRegistry) -> Vec<&'a str> {
        registry.names().filter(|name| !self.contains(name)).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.executors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}

impl std::fmt::Debug for ExecutorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorTable")
            .field("executors", &self.names())
            .finish()
    }
}
