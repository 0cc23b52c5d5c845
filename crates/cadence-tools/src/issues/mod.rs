//! # Issue Tracker Tools
//!
//! Executors for the issue tools (`get_jira`, `query_jira`, boards and
//! sprints). They talk to an [`IssueTracker`] constructed once by the host
//! with its own credentials; nothing here knows how the tracker is reached.
//!
//! Every fetched issue is also handed to an [`IssueSnapshotSink`], which by
//! default does nothing. A failing sink is logged and never fails the call.

pub mod executors;
pub mod snapshot;

pub use executors::{
    GetBoardIdTool, GetBoardTool, GetBoardsTool, GetIssueFieldsTool, GetIssueTool,
    GetProjectsTool, GetSprintTool, GetSprintsTool, QueryIssuesTool, issue_executors,
};
pub use snapshot::{DirectorySnapshotSink, IssueSnapshotSink, NoopSnapshotSink};

use cadence_core::ExecutorError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failure reported by an issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// The issue, board or sprint does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The tracker rejected the request.
    #[error("{0}")]
    Remote(String),

    /// The tracker could not be reached.
    #[error("{0}")]
    Transport(String),
}

impl From<TrackerError> for ExecutorError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::NotFound(m) => ExecutorError::NotFound(m),
            TrackerError::Remote(m) => ExecutorError::Remote(m),
            TrackerError::Transport(m) => ExecutorError::Network(m),
        }
    }
}

/// An issue with its fields flattened into one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Issue {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn summary(&self) -> Option<&str> {
        self.fields.get("summary").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: i64,
    pub name: String,
    /// Board kind as reported by the tracker (`scrum`, `kanban`...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Client for an issue tracker.
///
/// Implementations block until the tracker answers. Authentication and
/// retries are the implementor's concern.
pub trait IssueTracker: Send + Sync {
    /// Fetch one issue. With `fields`, only those fields need be present.
    fn fetch_issue(&self, key: &str, fields: Option<&[String]>) -> Result<Issue, TrackerError>;

    /// Run a tracker query, returning at most `max_results` issues.
    fn search(&self, query: &str, max_results: u32) -> Result<Vec<Issue>, TrackerError>;

    fn list_projects(&self) -> Result<Vec<Project>, TrackerError>;

    fn list_boards(&self) -> Result<Vec<Board>, TrackerError>;

    /// Resolve a board by exact name.
    ///
    /// The default scans [`list_boards`](Self::list_boards).
    fn board_id_by_name(&self, name: &str) -> Result<i64, TrackerError> {
        self.list_boards()?
            .into_iter()
            .find(|board| board.name == name)
            .map(|board| board.id)
            .ok_or_else(|| TrackerError::NotFound("Board not found".to_string()))
    }

    fn board_by_id(&self, id: i64) -> Result<Board, TrackerError>;

    fn list_sprints(&self, board_id: i64) -> Result<Vec<Sprint>, TrackerError>;

    fn sprint_by_id(&self, id: i64) -> Result<Sprint, TrackerError>;
}
