//! # Cadence Tools
//!
//! The built-in tool catalog and the standard executors that serve it.
//!
//! ## Features
//!
//! - **I/O Tools** (`io`): line-range reads and appends on text files
//! - **Network Tools** (`network`): a generic JSON HTTP request tool
//! - **Issue Tools** (`issues`): issue tracker lookups behind the
//!   [`issues::IssueTracker`] trait
//!
//! Memory tools and `message_chatgpt` are only described here; their
//! executors belong to the host application.

/// Tool specifications for every built-in tool.
pub mod catalog;
/// Issue tracker executors and the tracker abstraction they call.
#[cfg(feature = "issues")]
pub mod issues;
/// Standard executors: messaging, files, HTTP.
pub mod standard;
/// Assembly of an executor table from configuration.
pub mod toolkit;

pub use catalog::{builtin_registry, builtin_specifications};
pub use standard::*;
pub use toolkit::Toolkit;
