//! # Standard Executors
//!
//! Executors for the built-in tools that need nothing but the local machine
//! or a network connection.

#[cfg(feature = "io")]
pub mod io;
pub mod messaging;
#[cfg(feature = "network")]
pub mod network;

#[cfg(feature = "io")]
pub use io::{AppendTextFileTool, FileRoot, ReadTextFileTool};
pub use messaging::{MessageSink, Outbox, SendMessageTool};
#[cfg(feature = "network")]
pub use network::HttpRequestTool;
