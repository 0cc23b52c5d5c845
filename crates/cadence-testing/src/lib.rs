//! # Cadence Testing
//!
//! Test doubles for the collaborators behind the dispatcher boundary.
//!
//! ## Components
//!
//! - **Mock Executors**: canned responses, failures and panics with call
//!   tracking
//! - **In-Memory Issue Tracker**: a seeded [`IssueTracker`] for issue tool
//!   tests
//! - **Manual Clock**: a [`Clock`] that only moves when told to
//!
//! ## Usage
//!
//! ```rust
//! use cadence_core::{ToolExecutor, Arguments};
//! use cadence_testing::MockExecutor;
//! use serde_json::json;
//!
//! let mock = MockExecutor::new("get_projects")
//!     .with_default_response(json!({"projects": ["KMS"]}));
//! let payload = mock.execute(&Arguments::new()).expect("canned response");
//!
//! assert_eq!(payload["projects"], json!(["KMS"]));
//! assert_eq!(mock.call_count(), 1);
//! ```
//!
//! [`IssueTracker`]: cadence_tools::issues::IssueTracker
//! [`Clock`]: cadence_core::Clock

pub mod clock;
pub mod issue_tracker;
pub mod mock_executors;

pub use clock::ManualClock;
pub use issue_tracker::InMemoryIssueTracker;
pub use mock_executors::MockExecutor;
