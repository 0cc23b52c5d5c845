//! # Cadence
//!
//! Lets a conversational model call schema-described tools and decides,
//! after every call, whether to invoke the model again immediately or wait
//! for the next external event.
//!
//! ## Crates
//!
//! - [`cadence_core`]: registry, validator, dispatcher, pause window and
//!   heartbeat scheduler
//! - [`cadence_tools`]: the built-in catalog and standard executors
//! - this crate: [`AgentSession`], the per-conversation step driver
//!
//! ## Quick Start
//!
//! ```rust
//! use cadence::{AgentSession, CadenceConfig, SchedulerDecision, ToolCallRequest, Toolkit};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let toolkit = Toolkit::new(CadenceConfig::default());
//! let registry = Arc::new(toolkit.registry().expect("built-in catalog"));
//! let executors = toolkit.executors();
//!
//! let mut session = AgentSession::with_defaults(registry, &executors);
//! let outcome = session.step(&ToolCallRequest::new(
//!     "send_message",
//!     json!({"message": "Hi! How can I help?"}),
//! ));
//!
//! assert_eq!(outcome.decision(), SchedulerDecision::Yield);
//! ```

pub mod session;

pub use cadence_core::*;
pub use cadence_tools::{Toolkit, builtin_registry, builtin_specifications};
pub use session::{AgentSession, Rejection, StepOutcome};
