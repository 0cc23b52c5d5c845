//! # Agent Session
//!
//! One conversation's step driver. Each step resolves the tool, validates
//! the model's arguments, dispatches the call and asks the scheduler what
//! happens next.
//!
//! A session owns its pause window and its own `pause_heartbeats` executor,
//! so pausing one conversation never silences another. Registry and
//! executors are shared with every other session through `Arc`.

use cadence_core::{
    Clock, ExecutorTable, HeartbeatScheduler, PauseHeartbeatsTool, PauseWindowTracker,
    SchedulerDecision, SchemaError, SystemClock, ToolCallRequest, ToolExecutionResult,
    ToolRegistry, ValidationError, dispatch, validate,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

/// Why a call never reached its executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error(transparent)]
    UnknownTool(SchemaError),

    #[error(transparent)]
    Invalid(ValidationError),
}

impl Rejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::UnknownTool(_) => "unknown_tool",
            Rejection::Invalid(err) => err.kind(),
        }
    }

    /// Structured rejection handed back to the model.
    pub fn to_json(&self) -> Value {
        match self {
            Rejection::UnknownTool(err) => json!({
                "ok": false,
                "error": err.to_string(),
                "kind": self.kind(),
            }),
            Rejection::Invalid(err) => err.to_rejection(),
        }
    }
}

impl Serialize for Rejection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// What one step produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The call was dispatched; `result` may still be a failure.
    Executed {
        tool: String,
        result: ToolExecutionResult,
        decision: SchedulerDecision,
    },
    /// The call was refused before dispatch.
    Rejected {
        tool: String,
        rejection: Rejection,
        decision: SchedulerDecision,
    },
}

impl StepOutcome {
    pub fn tool(&self) -> &str {
        match self {
            StepOutcome::Executed { tool, .. } | StepOutcome::Rejected { tool, .. } => tool,
        }
    }

    pub fn decision(&self) -> SchedulerDecision {
        match self {
            StepOutcome::Executed { decision, .. } | StepOutcome::Rejected { decision, .. } => {
                *decision
            }
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, StepOutcome::Rejected { .. })
    }

    /// Body of the function-return message for the model's next turn.
    pub fn content(&self) -> Value {
        match self {
            StepOutcome::Executed { result, .. } => result.to_json(),
            StepOutcome::Rejected { rejection, .. } => rejection.to_json(),
        }
    }

    /// Function-return message in chat format: the content is JSON text.
    pub fn to_function_message(&self) -> Value {
        json!({
            "role": "function",
            "name": self.tool(),
            "content": self.content().to_string(),
        })
    }
}

pub struct AgentSession {
    registry: Arc<ToolRegistry>,
    executors: ExecutorTable,
    pause: Arc<PauseWindowTracker>,
    scheduler: HeartbeatScheduler,
    clock: Arc<dyn Clock>,
}

impl AgentSession {
    /// A session over shared `registry` and `executors`, with its own pause
    /// window served by a session-local `pause_heartbeats` executor.
    pub fn new(
        registry: Arc<ToolRegistry>,
        executors: &ExecutorTable,
        scheduler: HeartbeatScheduler,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let pause = Arc::new(PauseWindowTracker::new());
        let executors = executors
            .clone()
            .with_executor(Arc::new(PauseHeartbeatsTool::new(pause.clone(), clock.clone())));

        Self {
            registry,
            executors,
            pause,
            scheduler,
            clock,
        }
    }

    /// Default scheduler and the system clock.
    pub fn with_defaults(registry: Arc<ToolRegistry>, executors: &ExecutorTable) -> Self {
        Self::new(
            registry,
            executors,
            HeartbeatScheduler::default(),
            Arc::new(SystemClock),
        )
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn pause_window(&self) -> &PauseWindowTracker {
        &self.pause
    }

    /// Run one model-issued call to completion.
    pub fn step(&mut self, request: &ToolCallRequest) -> StepOutcome {
        let spec = match self.registry.get(&request.name) {
            Ok(spec) => spec,
            Err(err) => return self.reject(&request.name, Rejection::UnknownTool(err)),
        };

        let call = match validate(spec, &request.effective_arguments()) {
            Ok(call) => call,
            Err(err) => return self.reject(&request.name, Rejection::Invalid(err)),
        };

        let result = dispatch(&call, &self.executors);
        let decision = self
            .scheduler
            .decide(&call, &result, &self.pause, self.clock.now());

        StepOutcome::Executed {
            tool: request.name.clone(),
            result,
            decision,
        }
    }

    // A rejected call continues under an implied heartbeat so the model can
    // correct itself, unless a pause is active.
    fn reject(&self, tool: &str, rejection: Rejection) -> StepOutcome {
        tracing::warn!(tool, kind = rejection.kind(), error = %rejection, "Tool call rejected");
        let decision = self
            .scheduler
            .decide_flag(true, false, &self.pause, self.clock.now());
        StepOutcome::Rejected {
            tool: tool.to_string(),
            rejection,
            decision,
        }
    }

    /// A human message or other external input arrived.
    pub fn on_external_event(&mut self) {
        self.pause.clear();
    }

    /// Drive calls in order while each step asks to continue, stopping after
    /// `max_steps` steps at most.
    ///
    /// `requests` stands in for successive model turns; calls after the
    /// first `YIELD` are not consumed.
    pub fn run_chain<I>(&mut self, requests: I, max_steps: usize) -> Vec<StepOutcome>
    where
        I: IntoIterator<Item = ToolCallRequest>,
    {
        let mut outcomes = Vec::new();
        for request in requests.into_iter().take(max_steps) {
            let outcome = self.step(&request);
            let decision = outcome.decision();
            outcomes.push(outcome);
            if !decision.is_continue() {
                break;
            }
        }

        if outcomes.len() == max_steps
            && outcomes.last().is_some_and(|o| o.decision().is_continue())
        {
            tracing::info!(max_steps, "Continuation chain stopped at step limit");
        }
        outcomes
    }
}

impl std::fmt::Debug for AgentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSession")
            .field("tools", &self.registry.len())
            .field("executors", &self.executors)
            .field("pause", &self.pause.suppressed_until())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
