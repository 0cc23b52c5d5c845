//! Executors for the issue tools.

use super::snapshot::{IssueSnapshotSink, NoopSnapshotSink};
use super::{Issue, IssueTracker};
use cadence_core::{Arguments, ArgumentsExt, ExecutorError, Payload, ToolExecutor};
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Result cap for `query_jira` calls that do not pass `max_results`.
pub const DEFAULT_MAX_RESULTS: u32 = 50;

fn single(key: &str, value: Value) -> Payload {
    let mut payload = Payload::new();
    payload.insert(key.to_string(), value);
    payload
}

fn snapshot(sink: &dyn IssueSnapshotSink, issue: &Issue) {
    if let Err(e) = sink.record(issue) {
        tracing::warn!(issue = %issue.key, error = %e, "Failed to record issue snapshot");
    }
}

fn issue_object(issue: &Issue, fields: Option<&[String]>) -> Value {
    let mut object = Map::new();
    object.insert("key".into(), json!(issue.key));
    match fields {
        Some(names) => {
            for name in names {
                let value = issue.fields.get(name).cloned().unwrap_or(Value::Null);
                object.insert(name.clone(), value);
            }
        }
        None => {
            for (name, value) in &issue.fields {
                object.insert(name.clone(), value.clone());
            }
        }
    }
    Value::Object(object)
}

fn parse_fields(raw: &str) -> Result<Vec<String>, ExecutorError> {
    let fields: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    if fields.is_empty() {
        return Err(ExecutorError::InvalidInput(
            "fields must name at least one field".to_string(),
        ));
    }
    Ok(fields)
}

/// `get_jira`: one issue with all of its fields.
pub struct GetIssueTool {
    tracker: Arc<dyn IssueTracker>,
    sink: Arc<dyn IssueSnapshotSink>,
}

impl GetIssueTool {
    pub fn new(tracker: Arc<dyn IssueTracker>, sink: Arc<dyn IssueSnapshotSink>) -> Self {
        Self { tracker, sink }
    }
}

impl ToolExecutor for GetIssueTool {
    fn name(&self) -> &str {
        "get_jira"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let key = arguments.required_str("issue_key")?;
        let issue = self.tracker.fetch_issue(key, None)?;
        snapshot(self.sink.as_ref(), &issue);
        Ok(single("issue", issue_object(&issue, None)))
    }
}

/// `get_jira_fields`: one issue restricted to a comma separated field list.
/// Requested fields the issue lacks come back as `null`.
pub struct GetIssueFieldsTool {
    tracker: Arc<dyn IssueTracker>,
    sink: Arc<dyn IssueSnapshotSink>,
}

impl GetIssueFieldsTool {
    pub fn new(tracker: Arc<dyn IssueTracker>, sink: Arc<dyn IssueSnapshotSink>) -> Self {
        Self { tracker, sink }
    }
}

impl ToolExecutor for GetIssueFieldsTool {
    fn name(&self) -> &str {
        "get_jira_fields"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let key = arguments.required_str("issue_key")?;
        let fields = parse_fields(arguments.required_str("fields")?)?;
        let issue = self.tracker.fetch_issue(key, Some(fields.as_slice()))?;
        snapshot(self.sink.as_ref(), &issue);
        Ok(single("issue", issue_object(&issue, Some(fields.as_slice()))))
    }
}

/// `query_jira`: keys and summaries of the issues matching a query.
pub struct QueryIssuesTool {
    tracker: Arc<dyn IssueTracker>,
    default_max_results: u32,
}

impl QueryIssuesTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self {
            tracker,
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_default_max_results(mut self, max_results: u32) -> Self {
        self.default_max_results = max_results;
        self
    }
}

impl ToolExecutor for QueryIssuesTool {
    fn name(&self) -> &str {
        "query_jira"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let jql = arguments.required_str("jql")?;
        let max_results = match arguments.optional_i64("max_results") {
            None => self.default_max_results,
            Some(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
            Some(n) => {
                return Err(ExecutorError::InvalidInput(format!(
                    "max_results must be positive, got {}",
                    n
                )));
            }
        };

        let issues = self.tracker.search(jql, max_results)?;
        tracing::debug!(jql, max_results, found = issues.len(), "Issue query completed");

        let listed: Vec<Value> = issues
            .iter()
            .map(|issue| json!({"key": issue.key, "summary": issue.summary()}))
            .collect();
        Ok(single("issues", Value::Array(listed)))
    }
}

/// `get_projects`: project keys.
pub struct GetProjectsTool {
    tracker: Arc<dyn IssueTracker>,
}

impl GetProjectsTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }
}

impl ToolExecutor for GetProjectsTool {
    fn name(&self) -> &str {
        "get_projects"
    }

    fn execute(&self, _arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let keys: Vec<String> = self
            .tracker
            .list_projects()?
            .into_iter()
            .map(|p| p.key)
            .collect();
        Ok(single("projects", json!(keys)))
    }
}

/// `get_boards`: board names.
pub struct GetBoardsTool {
    tracker: Arc<dyn IssueTracker>,
}

impl GetBoardsTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }
}

impl ToolExecutor for GetBoardsTool {
    fn name(&self) -> &str {
        "get_boards"
    }

    fn execute(&self, _arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let names: Vec<String> = self
            .tracker
            .list_boards()?
            .into_iter()
            .map(|b| b.name)
            .collect();
        Ok(single("boards", json!(names)))
    }
}

pub struct GetBoardIdTool {
    tracker: Arc<dyn IssueTracker>,
}

impl GetBoardIdTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }
}

impl ToolExecutor for GetBoardIdTool {
    fn name(&self) -> &str {
        "get_board_id"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let name = arguments.required_str("board_name")?;
        let id = self.tracker.board_id_by_name(name)?;
        Ok(single("board_id", json!(id)))
    }
}

pub struct GetBoardTool {
    tracker: Arc<dyn IssueTracker>,
}

impl GetBoardTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }
}

impl ToolExecutor for GetBoardTool {
    fn name(&self) -> &str {
        "get_board"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let board = self.tracker.board_by_id(arguments.required_i64("board_id")?)?;
        Ok(single("board", serde_json::to_value(board)?))
    }
}

/// `get_sprints`: sprint names of one board.
pub struct GetSprintsTool {
    tracker: Arc<dyn IssueTracker>,
}

impl GetSprintsTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }
}

impl ToolExecutor for GetSprintsTool {
    fn name(&self) -> &str {
        "get_sprints"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let board_id = arguments.required_i64("board_id")?;
        let names: Vec<String> = self
            .tracker
            .list_sprints(board_id)?
            .into_iter()
            .map(|s| s.name)
            .collect();
        Ok(single("sprints", json!(names)))
    }
}

/// `get_sprint`: a sprint's name.
pub struct GetSprintTool {
    tracker: Arc<dyn IssueTracker>,
}

impl GetSprintTool {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }
}

impl ToolExecutor for GetSprintTool {
    fn name(&self) -> &str {
        "get_sprint"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let sprint = self.tracker.sprint_by_id(arguments.required_i64("sprint_id")?)?;
        Ok(single("sprint", json!(sprint.name)))
    }
}

/// Every issue executor, sharing one tracker and snapshot sink.
pub fn issue_executors(
    tracker: Arc<dyn IssueTracker>,
    sink: Option<Arc<dyn IssueSnapshotSink>>,
    default_max_results: u32,
) -> Vec<Arc<dyn ToolExecutor>> {
    let sink = sink.unwrap_or_else(|| Arc::new(NoopSnapshotSink) as Arc<dyn IssueSnapshotSink>);
    vec![
        Arc::new(GetIssueTool::new(tracker.clone(), sink.clone())),
        Arc::new(GetIssueFieldsTool::new(tracker.clone(), sink)),
        Arc::new(
            QueryIssuesTool::new(tracker.clone()).with_default_max_results(default_max_results),
        ),
        Arc::new(GetProjectsTool::new(tracker.clone())),
        Arc::new(GetBoardsTool::new(tracker.clone())),
        Arc::new(GetBoardIdTool::new(tracker.clone())),
        Arc::new(GetBoardTool::new(tracker.clone())),
        Arc::new(GetSprintsTool::new(tracker.clone())),
        Arc::new(GetSprintTool::new(tracker)),
    ]
}
