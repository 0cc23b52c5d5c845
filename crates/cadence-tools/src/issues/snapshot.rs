//! Debug snapshots of fetched issues.

use super::Issue;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Receives every issue fetched by the issue tools.
pub trait IssueSnapshotSink: Send + Sync {
    fn record(&self, issue: &Issue) -> io::Result<()>;
}

/// Discards snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSnapshotSink;

impl IssueSnapshotSink for NoopSnapshotSink {
    fn record(&self, _issue: &Issue) -> io::Result<()> {
        Ok(())
    }
}

/// Writes each issue as pretty JSON to `<dir>/<key>.json`, replacing any
/// earlier snapshot of the same issue.
#[derive(Debug, Clone)]
pub struct DirectorySnapshotSink {
    dir: PathBuf,
}

impl DirectorySnapshotSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot path for an issue key. Characters outside `[A-Za-z0-9_-]`
    /// become `_` so a key can never leave the directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl IssueSnapshotSink for DirectorySnapshotSink {
    fn record(&self, issue: &Issue) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(issue)?;
        fs::write(self.path_for(&issue.key), json)
    }
}
