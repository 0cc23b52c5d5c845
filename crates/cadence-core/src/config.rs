//! Configuration loading and parsing
//!
//! Configuration is read from TOML. Every section is optional and falls back
//! to defaults, so an empty file is a valid configuration.
//!
//! ```toml
//! [scheduler]
//! failure_policy = "yield_on_failure"
//!
//! [files]
//! base_dir = "./workspace"
//!
//! [[tools]]
//! name = "lookup_customer"
//! description = "Find a customer record"
//! [tools.parameters]
//! type = "object"
//! required = ["email"]
//! [tools.parameters.properties.email]
//! type = "string"
//! description = "Customer email"
//! ```

use crate::error::ConfigError;
use crate::registry::ToolRegistry;
use crate::scheduler::FailurePolicy;
use crate::schema::ToolSpecification;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    pub scheduler: SchedulerConfig,
    pub files: FilesConfig,
    pub http: HttpConfig,
    pub issues: IssuesConfig,
    pub logging: LoggingConfig,
    /// Extra tool specifications, in capability listing format.
    pub tools: Vec<ToolSpecification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Relative file names are resolved against this directory when set.
    pub base_dir: Option<PathBuf>,
    /// Cap on characters returned by a single line-range read.
    pub max_read_chars: usize,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            max_read_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuesConfig {
    /// Directory receiving `<issue key>.json` snapshots of fetched issues.
    pub snapshot_dir: Option<PathBuf>,
    /// Result cap for issue searches that do not pass `max_results`.
    pub default_max_results: u32,
}

impl Default for IssuesConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: None,
            default_max_results: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directive added to `RUST_LOG` when installing the subscriber.
    pub default_directive: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
        }
    }
}

impl CadenceConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_toml(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn load_from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: CadenceConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric bounds and the extra tool specifications.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files.max_read_chars == 0 {
            return Err(invalid("files.max_read_chars must be greater than zero"));
        }
        if self.http.timeout_secs == 0 {
            return Err(invalid("http.timeout_secs must be greater than zero"));
        }
        if self.issues.default_max_results == 0 {
            return Err(invalid("issues.default_max_results must be greater than zero"));
        }

        let mut scratch = ToolRegistry::new();
        scratch.register_all(self.tools.iter().cloned())?;
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid {
        message: message.to_string(),
    }
}
