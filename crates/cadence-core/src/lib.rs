//! # Cadence Core
//!
//! Core types for letting a conversational model call schema-described tools
//! and deciding, after every call, whether the agent loop should invoke the
//! model again immediately or wait for the next external event.
//!
//! Per step the pieces are used in this order:
//!
//! 1. [`ToolRegistry::get`] resolves the tool's [`ToolSpecification`];
//! 2. [`validate`] checks and coerces the model's arguments into a
//!    [`ValidatedCall`];
//! 3. [`dispatch`] runs the call through an [`ExecutorTable`] and returns a
//!    [`ToolExecutionResult`], never an error;
//! 4. [`HeartbeatScheduler::decide`] combines the call's heartbeat flag with
//!    the session's [`PauseWindowTracker`] into a [`SchedulerDecision`].

pub mod call;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod pause;
pub mod registry;
pub mod result;
pub mod scheduler;
pub mod schema;
pub mod validation;

pub use call::{Arguments, ToolCallRequest, ValidatedCall};
pub use clock::{Clock, SystemClock};
pub use config::CadenceConfig;
pub use dispatch::dispatch;
pub use error::{
    CadenceError, CadenceResult, ConfigError, ExpectedType, SchemaError, ValidationError,
};
pub use executor::{ArgumentsExt, ExecutorTable, ToolExecutor};
pub use pause::{MAX_PAUSE_HEARTBEATS, PAUSE_TOOL_NAME, PauseHeartbeatsTool, PauseWindowTracker};
pub use registry::ToolRegistry;
pub use result::{ExecutorError, Payload, ToolExecutionResult};
pub use scheduler::{FailurePolicy, HeartbeatScheduler, SchedulerDecision};
pub use schema::{
    HEARTBEAT_DESCRIPTION, HEARTBEAT_FIELD, PAGE_FIELD, Property, PropertyType,
    ToolSpecification, ToolSpecificationBuilder,
};
pub use validation::validate;
