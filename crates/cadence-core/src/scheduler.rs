//! # Heartbeat Continuation Scheduler
//!
//! After each tool invocation the enclosing agent loop asks whether to call
//! the model again right away or to wait for the next external event.
//!
//! The rule, in order:
//!
//! 1. an active pause window means [`SchedulerDecision::Yield`];
//! 2. otherwise a call that set `request_heartbeat = true` means
//!    [`SchedulerDecision::ContinueImmediately`];
//! 3. otherwise [`SchedulerDecision::Yield`].
//!
//! Whether a failed execution still honors the heartbeat is a product choice
//! captured by [`FailurePolicy`]. The scheduler holds no state across steps;
//! bounding long chains of continuations is the agent loop's job.

use crate::call::ValidatedCall;
use crate::pause::PauseWindowTracker;
use crate::result::ToolExecutionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the agent loop should do after a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulerDecision {
    /// Invoke the model again without waiting for external input.
    ContinueImmediately,
    /// Hand control back until a human message or timer arrives.
    Yield,
}

impl SchedulerDecision {
    pub fn is_continue(&self) -> bool {
        matches!(self, SchedulerDecision::ContinueImmediately)
    }
}

impl fmt::Display for SchedulerDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerDecision::ContinueImmediately => write!(f, "CONTINUE_IMMEDIATELY"),
            SchedulerDecision::Yield => write!(f, "YIELD"),
        }
    }
}

/// How a failed execution interacts with the heartbeat flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// A failure follows the same rule as a success, so the model can react
    /// to the error on its next turn.
    #[default]
    HonorHeartbeat,
    /// A failure always yields, leaving room for a human to step in.
    YieldOnFailure,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeartbeatScheduler {
    failure_policy: FailurePolicy,
}

impl HeartbeatScheduler {
    pub fn new(failure_policy: FailurePolicy) -> Self {
        Self { failure_policy }
    }

    /// Decide what follows a completed invocation.
    pub fn decide(
        &self,
        call: &ValidatedCall,
        result: &ToolExecutionResult,
        pause: &PauseWindowTracker,
        now: DateTime<Utc>,
    ) -> SchedulerDecision {
        let decision = self.decide_flag(call.requests_heartbeat(), result.is_failure(), pause, now);
        tracing::debug!(
            tool = %call.tool(),
            heartbeat = call.requests_heartbeat(),
            failed = result.is_failure(),
            decision = %decision,
            "Scheduled next step"
        );
        decision
    }

    /// The rule itself, for callers that have no validated call (a
    /// rejected request, for instance).
    pub fn decide_flag(
        &self,
        request_heartbeat: bool,
        failed: bool,
        pause: &PauseWindowTracker,
        now: DateTime<Utc>,
    ) -> SchedulerDecision {
        if pause.is_active(now) {
            return SchedulerDecision::Yield;
        }
        if failed && self.failure_policy == FailurePolicy::YieldOnFailure {
            return SchedulerDecision::Yield;
        }
        if request_heartbeat {
            SchedulerDecision::ContinueImmediately
        } else {
            SchedulerDecision::Yield
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Payload;
    use crate::schema::{PropertyType, ToolSpecification};
    use crate::validation::validate;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn heartbeat_call(flag: bool) -> ValidatedCall {
        let spec = ToolSpecification::builder("get_projects", "")
            .with_heartbeat()
            .build();
        validate(&spec, &json!({ "request_heartbeat": flag })).expect("valid")
    }

    fn message_call() -> ValidatedCall {
        let spec = ToolSpecification::builder("send_message", "")
            .property("message", PropertyType::String, "")
            .required("message")
            .build();
        validate(&spec, &json!({ "message": "hi", "request_heartbeat": true })).expect("valid")
    }

    fn ok() -> ToolExecutionResult {
        ToolExecutionResult::success(Payload::new())
    }

    fn failed() -> ToolExecutionResult {
        ToolExecutionResult::failure("Issue Does Not Exist")
    }

    #[test]
    fn heartbeat_continues_without_pause() {
        let scheduler = HeartbeatScheduler::default();
        let pause = PauseWindowTracker::new();
        assert_eq!(
            scheduler.decide(&heartbeat_call(true), &ok(), &pause, now()),
            SchedulerDecision::ContinueImmediately
        );
    }

    #[test]
    fn no_heartbeat_yields() {
        let scheduler = HeartbeatScheduler::default();
        let pause = PauseWindowTracker::new();
        assert_eq!(
            scheduler.decide(&heartbeat_call(false), &ok(), &pause, now()),
            SchedulerDecision::Yield
        );
    }

    #[test]
    fn active_pause_overrides_heartbeat() {
        let scheduler = HeartbeatScheduler::default();
        let pause = PauseWindowTracker::new();
        pause.set(100_000, now());

        let before_end = now() + Duration::minutes(1439);
        assert_eq!(
            scheduler.decide(&heartbeat_call(true), &ok(), &pause, before_end),
            SchedulerDecision::Yield
        );

        let after_end = now() + Duration::minutes(1440);
        assert_eq!(
            scheduler.decide(&heartbeat_call(true), &ok(), &pause, after_end),
            SchedulerDecision::ContinueImmediately
        );
    }

    #[test]
    fn failure_honors_heartbeat_by_default() {
        let scheduler = HeartbeatScheduler::default();
        let pause = PauseWindowTracker::new();
        assert_eq!(
            scheduler.decide(&heartbeat_call(true), &failed(), &pause, now()),
            SchedulerDecision::ContinueImmediately
        );
    }

    #[test]
    fn yield_on_failure_policy_forces_yield() {
        let scheduler = HeartbeatScheduler::new(FailurePolicy::YieldOnFailure);
        let pause = PauseWindowTracker::new();
        assert_eq!(
            scheduler.decide(&heartbeat_call(true), &failed(), &pause, now()),
            SchedulerDecision::Yield
        );
        assert_eq!(
            scheduler.decide(&heartbeat_call(true), &ok(), &pause, now()),
            SchedulerDecision::ContinueImmediately
        );
    }

    #[test]
    fn user_message_tool_always_yields() {
        let scheduler = HeartbeatScheduler::default();
        let pause = PauseWindowTracker::new();
        assert_eq!(
            scheduler.decide(&message_call(), &ok(), &pause, now()),
            SchedulerDecision::Yield
        );
        assert_eq!(
            scheduler.decide(&message_call(), &failed(), &pause, now()),
            SchedulerDecision::Yield
        );
    }

    #[test]
    fn decision_display_and_serde() {
        assert_eq!(SchedulerDecision::ContinueImmediately.to_string(), "CONTINUE_IMMEDIATELY");
        assert_eq!(
            serde_json::to_value(SchedulerDecision::Yield).expect("serialize"),
            json!("YIELD")
        );
    }
}
