//! Startup assembly of the shared registry and executor table.
//!
//! `pause_heartbeats` has no executor in the shared table: each
//! session registers its own, bound to its own pause window.

use crate::catalog::builtin_specifications;
#[cfg(feature = "issues")]
use crate::issues::{DirectorySnapshotSink, IssueSnapshotSink, IssueTracker, issue_executors};
use crate::standard::{MessageSink, Outbox, SendMessageTool};
use cadence_core::{CadenceConfig, ExecutorTable, SchemaError, ToolRegistry};
use std::sync::Arc;

pub struct Toolkit {
    config: CadenceConfig,
    messages: Arc<dyn MessageSink>,
    #[cfg(feature = "issues")]
    tracker: Option<Arc<dyn IssueTracker>>,
}

impl Toolkit {
    /// A toolkit delivering user messages to a fresh [`Outbox`].
    pub fn new(config: CadenceConfig) -> Self {
        Self {
            config,
            messages: Arc::new(Outbox::new()),
            #[cfg(feature = "issues")]
            tracker: None,
        }
    }

    pub fn with_message_sink(mut self, sink: Arc<dyn MessageSink>) -> Self {
        self.messages = sink;
        self
    }

    /// Serve the issue tools through `tracker`. Without one they have no
    /// executor and every call fails with a "no executor" result.
    #[cfg(feature = "issues")]
    pub fn with_issue_tracker(mut self, tracker: Arc<dyn IssueTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn config(&self) -> &CadenceConfig {
        &self.config
    }

    /// Built-in catalog followed by the configured extra tools.
    pub fn registry(&self) -> Result<ToolRegistry, SchemaError> {
        let mut registry = ToolRegistry::new();
        registry.register_all(builtin_specifications())?;
        registry.register_all(self.config.tools.iter().cloned())?;
        Ok(registry)
    }

    /// Executors for every built-in tool this process can serve.
    pub fn executors(&self) -> ExecutorTable {
        let send_message = SendMessageTool::new(self.messages.clone());
        let mut table = ExecutorTable::new().with_executor(Arc::new(send_message));

        #[cfg(feature = "io")]
        {
            use crate::standard::io::{AppendTextFileTool, FileRoot, ReadTextFileTool};

            let root = FileRoot::new(self.config.files.base_dir.clone());
            let max_chars = self.config.files.max_read_chars;
            table.insert(Arc::new(ReadTextFileTool::new(root.clone()).with_max_chars(max_chars)));
            table.insert(Arc::new(AppendTextFileTool::new(root)));
        }

        #[cfg(feature = "network")]
        {
            use crate::standard::network::HttpRequestTool;
            use std::time::Duration;

            let timeout = Duration::from_secs(self.config.http.timeout_secs);
            table.insert(Arc::new(HttpRequestTool::new().with_timeout(timeout)));
        }

        #[cfg(feature = "issues")]
        {
            if let Some(tracker) = &self.tracker {
                let sink = self.config.issues.snapshot_dir.as_ref().map(|dir| {
                    Arc::new(DirectorySnapshotSink::new(dir.clone())) as Arc<dyn IssueSnapshotSink>
                });
                for executor in issue_executors(
                    tracker.clone(),
                    sink,
                    self.config.issues.default_max_results,
                ) {
                    table.insert(executor);
                }
            }
        }

        tracing::debug!(executors = table.len(), "Executor table assembled");
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::PAUSE_TOOL_NAME;

    #[test]
    fn registry_includes_configured_tools() {
        let config = CadenceConfig::load_from_toml(
            r#"
            [[tools]]
            name = "lookup_customer"
            description = "Find a customer record"
            [tools.parameters]
            type = "object"
            required = ["email"]
            [tools.parameters.properties.email]
            type = "string"
            description = "Customer email"
            "#,
        )
        .expect("config");

        let registry = Toolkit::new(config).registry().expect("registry");
        assert!(registry.contains("lookup_customer"));
        assert!(registry.contains("get_jira"));
    }

    #[test]
    fn configured_tool_cannot_shadow_builtin() {
        let mut config = CadenceConfig::default();
        config.tools.push(
            cadence_core::ToolSpecification::builder("send_message", "again").build(),
        );
        let err = Toolkit::new(config).registry().unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateToolName { .. }));
    }

    #[test]
    fn host_supplied_tools_have_no_executor() {
        let toolkit = Toolkit::new(CadenceConfig::default());
        let registry = toolkit.registry().expect("registry");
        let missing = toolkit.executors().missing_for(&registry);

        assert!(missing.contains(&"core_memory_append"));
        assert!(missing.contains(&"message_chatgpt"));
        assert!(missing.contains(&PAUSE_TOOL_NAME));
        assert!(!missing.contains(&"send_message"));
        assert!(!missing.contains(&"read_from_text_file"));
        assert!(!missing.contains(&"http_request"));
        // No tracker configured.
        assert!(missing.contains(&"get_jira"));
    }
}
