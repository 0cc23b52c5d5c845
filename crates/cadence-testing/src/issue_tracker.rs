//! # In-Memory Issue Tracker
//!
//! A seeded [`IssueTracker`] with just enough query support for tests:
//! a `project = KEY` clause restricts results to that project, anything
//! else matches every issue.

use cadence_tools::issues::{Board, Issue, IssueTracker, Project, Sprint, TrackerError};
use serde_json::Map;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct InMemoryIssueTracker {
    issues: Vec<Issue>,
    projects: Vec<Project>,
    boards: Vec<Board>,
    sprints: Vec<(i64, Sprint)>,
    outage: Option<TrackerError>,
    queries: Mutex<Vec<(String, u32)>>,
}

impl InMemoryIssueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }

    pub fn with_project(mut self, key: impl Into<String>, name: impl Into<String>) -> Self {
        self.projects.push(Project {
            key: key.into(),
            name: name.into(),
        });
        self
    }

    pub fn with_board(mut self, id: i64, name: impl Into<String>) -> Self {
        self.boards.push(Board {
            id,
            name: name.into(),
            kind: Some("scrum".to_string()),
        });
        self
    }

    pub fn with_sprint(mut self, board_id: i64, id: i64, name: impl Into<String>) -> Self {
        self.sprints.push((
            board_id,
            Sprint {
                id,
                name: name.into(),
                state: None,
            },
        ));
        self
    }

    /// Make every call fail with `error`.
    pub fn with_outage(mut self, error: TrackerError) -> Self {
        self.outage = Some(error);
        self
    }

    /// Queries received by [`search`](IssueTracker::search), with their limit.
    pub fn queries(&self) -> Vec<(String, u32)> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .to_vec()
    }

    fn available(&self) -> Result<(), TrackerError> {
        match &self.outage {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn project_filter(query: &str) -> Option<String> {
    let lower = query.to_ascii_lowercase();
    let start = lower.find("project")?;
    let rest = query[start + "project".len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let key: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!key.is_empty()).then(|| key.to_ascii_uppercase())
}

impl IssueTracker for InMemoryIssueTracker {
    fn fetch_issue(&self, key: &str, fields: Option<&[String]>) -> Result<Issue, TrackerError> {
        self.available()?;
        let issue = self
            .issues
            .iter()
            .find(|issue| issue.key == key)
            .ok_or_else(|| TrackerError::NotFound("Issue Does Not Exist".to_string()))?;

        Ok(match fields {
            None => issue.clone(),
            Some(names) => Issue {
                key: issue.key.clone(),
                fields: issue
                    .fields
                    .iter()
                    .filter(|(name, _)| names.contains(*name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect::<Map<_, _>>(),
            },
        })
    }

    fn search(&self, query: &str, max_results: u32) -> Result<Vec<Issue>, TrackerError> {
        self.available()?;
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((query.to_string(), max_results));

        let prefix = project_filter(query).map(|key| format!("{}-", key));
        Ok(self
            .issues
            .iter()
            .filter(|issue| prefix.as_ref().is_none_or(|p| issue.key.starts_with(p.as_str())))
            .take(max_results as usize)
            .cloned()
            .collect())
    }

    fn list_projects(&self) -> Result<Vec<Project>, TrackerError> {
        self.available()?;
        Ok(self.projects.clone())
    }

    fn list_boards(&self) -> Result<Vec<Board>, TrackerError> {
        self.available()?;
        Ok(self.boards.clone())
    }

    fn board_by_id(&self, id: i64) -> Result<Board, TrackerError> {
        self.available()?;
        self.boards
            .iter()
            .find(|board| board.id == id)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound("Board not found".to_string()))
    }

    fn list_sprints(&self, board_id: i64) -> Result<Vec<Sprint>, TrackerError> {
        self.board_by_id(board_id)?;
        Ok(self
            .sprints
            .iter()
            .filter(|(board, _)| *board == board_id)
            .map(|(_, sprint)| sprint.clone())
            .collect())
    }

    fn sprint_by_id(&self, id: i64) -> Result<Sprint, TrackerError> {
        self.available()?;
        self.sprints
            .iter()
            .map(|(_, sprint)| sprint)
            .find(|sprint| sprint.id == id)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound("Sprint not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> InMemoryIssueTracker {
        InMemoryIssueTracker::new()
            .with_issue(Issue::new("KMS-1").with_field("summary", "Login fails"))
            .with_issue(Issue::new("KMS-2").with_field("summary", "Slow search"))
            .with_issue(Issue::new("OPS-1").with_field("summary", "Rotate keys"))
            .with_board(12, "KMS board")
            .with_sprint(12, 3, "Sprint 3")
            .with_sprint(12, 4, "Sprint 4")
    }

    #[test]
    fn project_clause_filters_and_limit_truncates() {
        let tracker = tracker();
        let kms = tracker
            .search("project = kms AND status = Open", 10)
            .expect("search");
        assert_eq!(kms.len(), 2);

        let everything = tracker.search("order by created", 2).expect("search");
        assert_eq!(everything.len(), 2);
        assert_eq!(tracker.queries().len(), 2);
    }

    #[test]
    fn field_restriction_keeps_only_requested() {
        let issue = tracker()
            .fetch_issue("KMS-1", Some(["status".to_string()].as_slice()))
            .expect("issue");
        assert!(issue.fields.is_empty());
    }

    #[test]
    fn unknown_issue_does_not_exist() {
        assert_eq!(
            tracker().fetch_issue("KMS-99", None),
            Err(TrackerError::NotFound("Issue Does Not Exist".into()))
        );
    }

    #[test]
    fn sprints_belong_to_boards() {
        let tracker = tracker();
        assert_eq!(tracker.list_sprints(12).expect("sprints").len(), 2);
        assert!(tracker.list_sprints(99).is_err());
        assert_eq!(tracker.sprint_by_id(4).expect("sprint").name, "Sprint 4");
    }

    #[test]
    fn outage_fails_every_call() {
        let tracker = tracker().with_outage(TrackerError::Transport("timed out".into()));
        assert!(tracker.list_boards().is_err());
        assert!(tracker.search("x", 1).is_err());
        assert!(tracker.queries().is_empty());
    }
}
