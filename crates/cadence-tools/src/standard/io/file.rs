//! # Text File Tools
//!
//! Line-oriented reads and appends. Relative file names resolve against an
//! optional base directory so an agent can be confined to a workspace.

use cadence_core::{Arguments, ArgumentsExt, ExecutorError, Payload, ToolExecutor};
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Default cap on characters returned by one read.
pub const DEFAULT_MAX_READ_CHARS: usize = 500;

/// Where relative file names are resolved.
#[derive(Debug, Clone, Default)]
pub struct FileRoot {
    base_dir: Option<PathBuf>,
}

impl FileRoot {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    pub fn resolve(&self, filename: &str) -> PathBuf {
        let path = Path::new(filename);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn ensure_exists(path: &Path, filename: &str) -> Result<(), ExecutorError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ExecutorError::NotFound(format!(
            "The file '{}' does not exist.",
            filename
        )))
    }
}

/// Executor for `read_from_text_file`.
#[derive(Debug, Clone)]
pub struct ReadTextFileTool {
    root: FileRoot,
    max_chars: usize,
}

impl ReadTextFileTool {
    pub fn new(root: FileRoot) -> Self {
        Self {
            root,
            max_chars: DEFAULT_MAX_READ_CHARS,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    fn read_lines(
        &self,
        path: &Path,
        line_start: usize,
        num_lines: usize,
    ) -> Result<String, ExecutorError> {
        let reader = BufReader::new(fs::File::open(path)?);
        let line_end = line_start + num_lines;

        let mut lines = Vec::new();
        let mut chars_read = 0usize;
        for (index, line) in reader.lines().enumerate() {
            let number = index + 1;
            if number >= line_end {
                break;
            }
            let line = line?;
            if number < line_start {
                continue;
            }

            // Count the newline the reader stripped.
            let line_chars = line.chars().count() + 1;
            if chars_read + line_chars > self.max_chars {
                let room = self.max_chars - chars_read;
                lines.push(line.chars().take(room).collect::<String>());
                lines.push(format!(
                    "[SYSTEM ALERT - max chars ({}) reached during file read]",
                    self.max_chars
                ));
                break;
            }
            chars_read += line_chars;
            lines.push(line);
        }

        Ok(lines.join("\n"))
    }
}

impl ToolExecutor for ReadTextFileTool {
    fn name(&self) -> &str {
        "read_from_text_file"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let filename = arguments.required_str("filename")?;
        let line_start = arguments.required_i64("line_start")?;
        let num_lines = arguments.optional_i64("num_lines").unwrap_or(1);

        if line_start < 1 || num_lines < 1 {
            return Err(ExecutorError::InvalidInput(
                "Both line_start and num_lines must be positive integers.".to_string(),
            ));
        }

        let path = self.root.resolve(filename);
        ensure_exists(&path, filename)?;

        let content = self.read_lines(&path, line_start as usize, num_lines as usize)?;
        tracing::debug!(path = %path.display(), line_start, num_lines, "Read text file");

        let mut payload = Payload::new();
        payload.insert("content".into(), json!(content));
        Ok(payload)
    }
}

/// Executor for `append_to_text_file`.
#[derive(Debug, Clone)]
pub struct AppendTextFileTool {
    root: FileRoot,
}

impl AppendTextFileTool {
    pub fn new(root: FileRoot) -> Self {
        Self { root }
    }
}

impl ToolExecutor for AppendTextFileTool {
    fn name(&self) -> &str {
        "append_to_text_file"
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let filename = arguments.required_str("filename")?;
        let content = arguments.required_str("content")?;

        let path = self.root.resolve(filename);
        ensure_exists(&path, filename)?;

        let mut file = OpenOptions::new().append(true).open(&path)?;
        writeln!(file, "{}", content)?;
        tracing::debug!(path = %path.display(), bytes = content.len() + 1, "Appended to text file");

        let mut payload = Payload::new();
        payload.insert("bytes_written".into(), json!(content.len() + 1));
        Ok(payload)
    }
}
