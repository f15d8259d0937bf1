#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Lifecycle events emitted by match attempts.
//!
//! The capture is global to the test binary, so every test uses its own
//! class name and filters events by it.

use approvex_core::logging_facility::test_capture::{init_test_capture, CapturedEvent, TestCapture};
use approvex_core::{ObjectRef, SkipRule, Value};
use approvex_engine::SnapshotMatcher;
use approvex_store::TestContext;
use std::fs;
use tempfile::TempDir;

const OP: &str = "match_snapshot";

/// Events of the single attempt started for `class_name`.
fn attempt_events(capture: &TestCapture, class_name: &str) -> Vec<CapturedEvent> {
    let start = capture
        .events()
        .into_iter()
        .find(|e| {
            e.op.as_deref() == Some(OP)
                && e.event.as_deref() == Some("start")
                && e.field("test_class") == Some(class_name)
        })
        .expect("start event");
    let attempt_id = start.attempt_id.clone().expect("attempt id on start");
    capture.events_for_attempt(&attempt_id)
}

#[test]
fn test_first_run_logs_start_and_end_with_outcome() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let context = TestContext::new("logging::first_run", "first", dir.path());

    SnapshotMatcher::new()
        .matches(&Value::from("{}"), &context)
        .unwrap();

    let events = attempt_events(&capture, "logging::first_run");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some("start"));
    assert_eq!(events[0].field("test_method"), Some("first"));
    assert_eq!(events[1].event.as_deref(), Some("end"));
    assert_eq!(events[1].field("outcome"), Some("not_approved_created"));
    assert!(events[1].field("duration_ms").is_some());
    assert!(events[1]
        .field("approved_file")
        .unwrap()
        .ends_with("-approved.json"));
}

#[test]
fn test_matched_attempt_logs_matched() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let context = TestContext::new("logging::matched", "second", dir.path());
    let matcher = SnapshotMatcher::new();
    let reference = matcher.locate(&context);
    fs::create_dir_all(reference.path_name()).unwrap();
    fs::write(reference.approved_path(), "[1,2]").unwrap();

    let outcome = matcher.matches(&Value::from("[1, 2]"), &context).unwrap();
    assert!(outcome.is_match());

    let events = attempt_events(&capture, "logging::matched");
    let end = events.last().unwrap();
    assert_eq!(end.field("outcome"), Some("matched"));
    assert_eq!(end.field("circular_types_len"), Some("0"));
    assert_eq!(end.field("custom_matchers_len"), Some("0"));
}

#[test]
fn test_environment_failure_logs_end_error_with_code() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let context = TestContext::new("logging::cycle", "third", dir.path());

    let node = ObjectRef::new("Node");
    node.set_field("next", node.clone());

    SnapshotMatcher::new()
        .skip_circular_reference_check(SkipRule::for_type("Node"))
        .matches(&Value::Object(node), &context)
        .unwrap_err();

    let events = attempt_events(&capture, "logging::cycle");
    assert_eq!(events.len(), 2);
    let failure = &events[1];
    assert_eq!(failure.event.as_deref(), Some("end_error"));
    assert_eq!(failure.level, tracing::Level::ERROR);
    assert_eq!(failure.field("err.code"), Some("ERR_UNRESOLVED_CYCLE"));

    let attempt_id = events[0].attempt_id.as_deref().unwrap();
    let message = failure.field("err.message").unwrap();
    assert!(message.contains("(type: Node)"));
    assert!(message.contains(&format!("(attempt_id: {})", attempt_id)));
}
