//! # Pause Window
//!
//! A session may ask to stop being woken up automatically for a while. The
//! [`PauseWindowTracker`] holds that request as a single instant,
//! `suppressed_until`; while it lies in the future the scheduler yields
//! regardless of heartbeat flags.
//!
//! There is never more than one window: every `set` replaces the previous
//! value, and `clear` (on new external input) or the passage of time drops
//! it. The value lives in one atomic cell, so the pause tool can write it
//! while the scheduler reads it without further locking.

use crate::call::Arguments;
use crate::clock::Clock;
use crate::executor::{ArgumentsExt, ToolExecutor};
use crate::result::{ExecutorError, Payload};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Longest pause a single request may ask for, in minutes (one day).
pub const MAX_PAUSE_HEARTBEATS: i64 = 1440;

/// Name of the tool that opens a pause window.
pub const PAUSE_TOOL_NAME: &str = "pause_heartbeats";

const NO_WINDOW: i64 = i64::MIN;

/// Clamp a requested pause length to `[1, MAX_PAUSE_HEARTBEATS]`.
pub fn clamp_minutes(minutes: i64) -> i64 {
    minutes.clamp(1, MAX_PAUSE_HEARTBEATS)
}

/// Per-session suppression window for automatic continuation.
#[derive(Debug)]
pub struct PauseWindowTracker {
    // Microseconds since the epoch, or NO_WINDOW.
    suppressed_until: AtomicI64,
}

impl Default for PauseWindowTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PauseWindowTracker {
    pub fn new() -> Self {
        Self {
            suppressed_until: AtomicI64::new(NO_WINDOW),
        }
    }

    /// Suppress automatic continuation for `minutes` from `now`.
    ///
    /// Out-of-range requests are clamped, not rejected. Any earlier window
    /// is overwritten. Returns the stored `suppressed_until`.
    pub fn set(&self, minutes: i64, now: DateTime<Utc>) -> DateTime<Utc> {
        let minutes = clamp_minutes(minutes);
        let until = now + Duration::minutes(minutes);
        self.suppressed_until
            .store(until.timestamp_micros(), Ordering::SeqCst);

        tracing::info!(minutes, suppressed_until = %until, "Heartbeats paused");
        until
    }

    /// Whether automatic continuation is suppressed at `now`.
    ///
    /// A window whose end has been reached is cleared as a side effect.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        let until = self.suppressed_until.load(Ordering::SeqCst);
        if until == NO_WINDOW {
            return false;
        }
        if now.timestamp_micros() < until {
            return true;
        }

        // Only clear the window we looked at; a concurrent `set` wins.
        let _ = self.suppressed_until.compare_exchange(
            until,
            NO_WINDOW,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        tracing::debug!("Pause window elapsed");
        false
    }

    /// Drop the window, e.g. because a new human message arrived.
    pub fn clear(&self) {
        let previous = self.suppressed_until.swap(NO_WINDOW, Ordering::SeqCst);
        if previous != NO_WINDOW {
            tracing::debug!("Pause window cleared by external event");
        }
    }

    pub fn suppressed_until(&self) -> Option<DateTime<Utc>> {
        match self.suppressed_until.load(Ordering::SeqCst) {
            NO_WINDOW => None,
            micros => DateTime::from_timestamp_micros(micros),
        }
    }
}

/// Executor for `pause_heartbeats`: the only writer of a session's window.
pub struct PauseHeartbeatsTool {
    tracker: Arc<PauseWindowTracker>,
    clock: Arc<dyn Clock>,
}

impl PauseHeartbeatsTool {
    pub fn new(tracker: Arc<PauseWindowTracker>, clock: Arc<dyn Clock>) -> Self {
        Self { tracker, clock }
    }
}

impl ToolExecutor for PauseHeartbeatsTool {
    fn name(&self) -> &str {
        PAUSE_TOOL_NAME
    }

    fn execute(&self, arguments: &Arguments) -> Result<Payload, ExecutorError> {
        let requested = arguments.required_i64("minutes")?;
        let until = self.tracker.set(requested, self.clock.now());

        let mut payload = Payload::new();
        payload.insert("minutes".into(), json!(clamp_minutes(requested)));
        payload.insert("paused_until".into(), json!(until.to_rfc3339()));
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn oversized_request_is_clamped_to_max() {
        let tracker = PauseWindowTracker::new();
        let until = tracker.set(100_000, t0());

        assert_eq!(until, t0() + Duration::minutes(MAX_PAUSE_HEARTBEATS));
        assert_eq!(tracker.suppressed_until(), Some(until));
    }

    #[test]
    fn undersized_request_is_clamped_to_one_minute() {
        let tracker = PauseWindowTracker::new();
        assert_eq!(tracker.set(0, t0()), t0() + Duration::minutes(1));
        assert_eq!(tracker.set(-30, t0()), t0() + Duration::minutes(1));
    }

    #[test]
    fn active_until_boundary_then_cleared() {
        let tracker = PauseWindowTracker::new();
        tracker.set(10, t0());

        assert!(tracker.is_active(t0()));
        assert!(tracker.is_active(t0() + Duration::minutes(10) - Duration::seconds(1)));
        assert!(!tracker.is_active(t0() + Duration::minutes(10)));
        assert_eq!(tracker.suppressed_until(), None);
    }

    #[test]
    fn latest_write_wins() {
        let tracker = PauseWindowTracker::new();
        tracker.set(60, t0());
        tracker.set(5, t0());

        assert_eq!(tracker.suppressed_until(), Some(t0() + Duration::minutes(5)));
        assert!(!tracker.is_active(t0() + Duration::minutes(6)));
    }

    #[test]
    fn clear_drops_window() {
        let tracker = PauseWindowTracker::new();
        tracker.set(60, t0());
        tracker.clear();

        assert!(!tracker.is_active(t0()));
        assert_eq!(tracker.suppressed_until(), None);
    }

    #[test]
    fn inactive_without_window() {
        assert!(!PauseWindowTracker::new().is_active(t0()));
    }

    #[test]
    fn pause_tool_writes_tracker() {
        let tracker = Arc::new(PauseWindowTracker::new());
        let tool = PauseHeartbeatsTool::new(tracker.clone(), Arc::new(FixedClock(t0())));

        let mut arguments = Arguments::new();
        arguments.insert("minutes".into(), json!(5000));
        let payload = tool.execute(&arguments).expect("pause");

        assert_eq!(payload["minutes"], json!(MAX_PAUSE_HEARTBEATS));
        assert_eq!(
            tracker.suppressed_until(),
            Some(t0() + Duration::minutes(MAX_PAUSE_HEARTBEATS))
        );
    }
}
