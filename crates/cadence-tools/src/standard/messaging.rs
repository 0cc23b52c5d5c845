//! # Messaging
//!
//! `send_message` is how the model talks to the human. Its specification
//! has no heartbeat property, so a message always hands control back.

use cadence_core::{Arguments, ArgumentsExt, ExecutorError, Payload, ToolExecutor};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Destination for messages addressed to the user.
pub trait MessageSink: Send + Sync {
    fn deliver(&self, message: &str) -> Result<(), ExecutorError>;
}

/// In-memory sink collecting delivered messages in order.
#[derive(Debug, Default)]
pub struct Outbox {
    messages: Mutex<Vec<String>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Remove and return every pending message.
    pub fn drain(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(mut messages) => std::mem::take(&mut *messages),
            Err(_) => Vec::new(),
        }
    }
}

impl MessageSink for Outbox {
    fn deliver(&self, message: &str) -> Result<(), ExecutorError> {
        let mut messages = self
            .messages
            .lock()
            .map_err(|_| ExecutorError::Other("outbox lock poisoned".to_string()))?;
        messages.push(message.to_string());
        Ok(())
    }
}

/// Executor for `send_message`.
pub struct SendMessageTool {
    sink: Arc<dyn MessageSink>,
}

impl SendMessageTool {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self { sink }
    }
}

impl ToolExecutor for SendMessageTool {
    fn name(&self) -> &str {
        "send_message"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let message = arguments.required_str("message")?;
        self.sink.deliver(message)?;
        tracing::debug!(chars = message.chars().count(), "Message sent to user");

        let mut payload = Payload::new();
        payload.insert("delivered".into(), json!(true));
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(message: &str) -> Arguments {
        let mut arguments = Arguments::new();
        arguments.insert("message".into(), json!(message));
        arguments
    }

    #[test]
    fn delivers_to_outbox() {
        let outbox = Arc::new(Outbox::new());
        let tool = SendMessageTool::new(outbox.clone());

        let payload = tool.execute(&args("Hello 👋")).expect("delivered");
        assert_eq!(payload["delivered"], json!(true));
        tool.execute(&args("second")).expect("delivered");

        assert_eq!(outbox.messages(), ["Hello 👋", "second"]);
        assert_eq!(outbox.drain().len(), 2);
        assert!(outbox.messages().is_empty());
    }

    #[test]
    fn missing_message_is_invalid_input() {
        let tool = SendMessageTool::new(Arc::new(Outbox::new()));
        let err = tool.execute(&Arguments::new()).unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }
}
