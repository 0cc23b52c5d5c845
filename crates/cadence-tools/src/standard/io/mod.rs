//! Text file executors.

pub mod file;

pub use file::{AppendTextFileTool, DEFAULT_MAX_READ_CHARS, FileRoot, ReadTextFileTool};
