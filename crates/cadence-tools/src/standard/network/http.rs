//! # HTTP Request Tool
//!
//! A single generic tool covering every method. Requests carry a JSON
//! content type; GET sends no body, other methods send `payload_json`
//! (or `{}` when it is absent).

use cadence_core::{Arguments, ArgumentsExt, ExecutorError, Payload, ToolExecutor};
use reqwest::{Client, Method};
use serde_json::{Map, Value, json};
use std::future::Future;
use std::time::Duration;
use tokio::runtime::RuntimeFlavor;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Execute an async operation on the current runtime, or on a fresh one
/// when called outside of tokio.
///
/// Inside tokio this blocks a worker thread with `block_in_place`, which a
/// current-thread runtime cannot do; that case is reported as an error.
fn run_async<F, Fut>(f: F) -> Result<Payload, ExecutorError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Payload, ExecutorError>>,
{
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        if handle.runtime_flavor() == RuntimeFlavor::CurrentThread {
            return Err(ExecutorError::Other(
                "http_request cannot block inside a current-thread tokio runtime; \
                 call it from a multi-threaded runtime or outside tokio"
                    .to_string(),
            ));
        }
        tokio::task::block_in_place(|| handle.block_on(f()))
    } else {
        match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(f()),
            Err(e) => Err(ExecutorError::Other(format!(
                "Failed to create async runtime: {}",
                e
            ))),
        }
    }
}

/// Executor for `http_request`.
///
/// Synchronous from the caller's side. When the calling thread is already
/// inside tokio, that runtime must be multi-threaded.
pub struct HttpRequestTool {
    client: Client,
    timeout: Duration,
}

impl HttpRequestTool {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn execute_async(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<Payload, ExecutorError> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(self.timeout);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ExecutorError::Network(format!("HTTP request timed out: {}", e))
            } else {
                ExecutorError::Network(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let headers: Map<String, Value> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    json!(String::from_utf8_lossy(value.as_bytes())),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ExecutorError::Network(format!("Failed to read response body: {}", e)))?;

        tracing::debug!(%method, url, status, "HTTP request completed");

        let mut payload = Payload::new();
        payload.insert("status_code".into(), json!(status));
        payload.insert("headers".into(), Value::Object(headers));
        payload.insert("body".into(), json!(body));
        Ok(payload)
    }
}

impl Default for HttpRequestTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolExecutor for HttpRequestTool {
    fn name(&self) -> &str {
        "http_request"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let method_name = arguments.required_str("method")?.trim().to_uppercase();
        let url = arguments.required_str("url")?;

        let method = Method::from_bytes(method_name.as_bytes()).map_err(|_| {
            ExecutorError::InvalidInput(format!("Unsupported HTTP method '{}'", method_name))
        })?;

        let body = if method == Method::GET {
            None
        } else {
            match arguments.optional_str("payload_json") {
                Some(raw) if !raw.trim().is_empty() => Some(serde_json::from_str::<Value>(raw)?),
                _ => Some(json!({})),
            }
        };

        run_async(|| self.execute_async(method, url, body))
    }
}
