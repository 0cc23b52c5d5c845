//! Property-Based Tests for Continuation Decisions
//!
//! Invariants of the pause window and the scheduler that must hold for any
//! pause length, clock offset and call outcome.

use cadence::{
    FailurePolicy, HeartbeatScheduler, MAX_PAUSE_HEARTBEATS, PauseWindowTracker,
    SchedulerDecision, ToolSpecification, validate,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use serde_json::json;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn policy_strategy() -> impl Strategy<Value = FailurePolicy> {
    prop_oneof![
        Just(FailurePolicy::HonorHeartbeat),
        Just(FailurePolicy::YieldOnFailure)
    ]
}

proptest! {
    /// Property: any requested pause is clamped into [1, 1440] minutes
    #[test]
    fn prop_pause_is_clamped(minutes in any::<i64>()) {
        let tracker = PauseWindowTracker::new();
        let until = tracker.set(minutes, start());
        let length = (until - start()).num_minutes();

        prop_assert!((1..=MAX_PAUSE_HEARTBEATS).contains(&length));
        prop_assert_eq!(length, minutes.clamp(1, MAX_PAUSE_HEARTBEATS));
    }

    /// Property: an active pause yields regardless of heartbeat, outcome or policy
    #[test]
    fn prop_active_pause_always_yields(
        minutes in 1i64..=MAX_PAUSE_HEARTBEATS,
        elapsed_fraction in 0.0f64..1.0,
        heartbeat in any::<bool>(),
        failed in any::<bool>(),
        policy in policy_strategy(),
    ) {
        let tracker = PauseWindowTracker::new();
        tracker.set(minutes, start());
        let elapsed_secs = (minutes as f64 * 60.0 * elapsed_fraction) as i64;
        let now = start() + Duration::seconds(elapsed_secs);

        let scheduler = HeartbeatScheduler::new(policy);
        let decision = scheduler.decide_flag(heartbeat, failed, &tracker, now);
        prop_assert_eq!(decision, SchedulerDecision::Yield);
    }

    /// Property: without a pause the heartbeat flag alone decides under the
    /// default policy
    #[test]
    fn prop_heartbeat_decides_without_pause(heartbeat in any::<bool>(), failed in any::<bool>()) {
        let tracker = PauseWindowTracker::new();
        let scheduler = HeartbeatScheduler::default();
        let decision = scheduler.decide_flag(heartbeat, failed, &tracker, start());
        prop_assert_eq!(decision.is_continue(), heartbeat);
    }

    /// Property: a later set always replaces the earlier window
    #[test]
    fn prop_latest_pause_wins(first in 1i64..=1440, second in 1i64..=1440) {
        let tracker = PauseWindowTracker::new();
        tracker.set(first, start());
        let until = tracker.set(second, start());
        prop_assert_eq!(tracker.suppressed_until(), Some(until));
    }

    /// Property: string arguments never cause a rejection for string properties
    #[test]
    fn prop_any_string_is_a_valid_message(message in ".*") {
        let spec = ToolSpecification::builder("send_message", "Sends a message to the human user.")
            .property("message", cadence::PropertyType::String, "Message contents.")
            .required("message")
            .build();
        let call = validate(&spec, &json!({"message": message.clone()}));
        prop_assert!(call.is_ok());
        let call = call.unwrap();
        prop_assert_eq!(call.arguments()["message"].as_str(), Some(message.as_str()));
    }
}
