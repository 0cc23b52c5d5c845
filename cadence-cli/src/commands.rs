//! Subcommand implementations. Each returns the text to print so the
//! commands can be tested without capturing stdout.

use cadence::{CadenceConfig, ConfigError, SchemaError, ToolCallRequest, Toolkit, validate};
use serde_json::{Value, json};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Arguments are not valid JSON: {0}")]
    Arguments(#[from] serde_json::Error),
}

pub fn load_config(path: Option<&Path>) -> Result<CadenceConfig, ConfigError> {
    match path {
        Some(path) => CadenceConfig::load_from_file(path),
        None => Ok(CadenceConfig::default()),
    }
}

/// The capability listing of the built-in catalog plus configured tools.
pub fn catalog(config: CadenceConfig) -> Result<String, CommandError> {
    let registry = Toolkit::new(config).registry()?;
    Ok(serde_json::to_string_pretty(&registry.capability_listing())?)
}

/// Validate one call. A rejection is reported as output, not as an error.
pub fn validate_call(
    config: CadenceConfig,
    tool: &str,
    arguments: &str,
) -> Result<String, CommandError> {
    let registry = Toolkit::new(config).registry()?;
    let arguments: Value = serde_json::from_str(arguments)?;
    let request = ToolCallRequest::new(tool, arguments);

    let report = match registry.get(&request.name) {
        Err(err) => json!({"ok": false, "error": err.to_string(), "kind": "unknown_tool"}),
        Ok(spec) => match validate(spec, &request.effective_arguments()) {
            Ok(call) => json!({
                "ok": true,
                "tool": call.tool(),
                "arguments": call.arguments(),
                "request_heartbeat": call.requests_heartbeat(),
            }),
            Err(err) => err.to_rejection(),
        },
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Load and validate a configuration file, summarizing what it contains.
pub fn check_config(path: &Path) -> Result<String, CommandError> {
    let config = CadenceConfig::load_from_file(path)?;
    let extra = config.tools.len();
    let policy = config.scheduler.failure_policy;
    let registry = Toolkit::new(config).registry()?;

    Ok(format!(
        "{}: ok ({} tools, {} from config, failure policy {:?})",
        path.display(),
        registry.len(),
        extra,
        policy
    ))
}
