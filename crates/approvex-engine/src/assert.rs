//! Panic-based assertions for test functions.

use approvex_core::value::Value;
use approvex_store::naming::TestContext;
use serde::Serialize;

use crate::outcome::MatchOutcome;
use crate::snapshot_matcher::SnapshotMatcher;

/// Panic message when [`assert_approved_err`] gets `Ok`.
pub const NO_ERROR_MESSAGE: &str = "Expected error but no error was returned!";

/// Assert that `actual` matches its approved snapshot.
///
/// ```no_run
/// use approvex_engine::{assert_approved, test_context, SnapshotMatcher};
///
/// let matcher = SnapshotMatcher::new().ignoring_path("createdAt");
/// assert_approved(r#"{"id": 1}"#, &matcher, &test_context!());
/// ```
///
/// # Panics
///
/// Panics with the outcome report when the attempt does not end in
/// [`MatchOutcome::Matched`], and with the error message when the approval
/// files cannot be read or written.
pub fn assert_approved<V: Into<Value>>(actual: V, matcher: &SnapshotMatcher, context: &TestContext) {
    assert_approved_with_reason("", actual, matcher, context);
}

/// [`assert_approved`] with `reason` as the first line of the failure.
///
/// # Panics
///
/// Same as [`assert_approved`].
pub fn assert_approved_with_reason<V: Into<Value>>(
    reason: &str,
    actual: V,
    matcher: &SnapshotMatcher,
    context: &TestContext,
) {
    let actual = actual.into();
    let failure = match matcher.matches(&actual, context) {
        Ok(MatchOutcome::Matched) => return,
        Ok(outcome) => failure_report(&outcome),
        Err(e) => e.to_string(),
    };
    if reason.is_empty() {
        panic!("{}", failure);
    }
    panic!("{}\n{}", reason, failure);
}

/// Run `action`, assert that its error matches the approved snapshot and
/// hand the error back for further checks.
///
/// The error is converted like any serializable value, so a bare `String`
/// error is read as JSON text. Wrap plain messages in a struct.
///
/// ```no_run
/// use approvex_engine::{assert_approved_err, test_context, SnapshotMatcher};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct ParseError {
///     input: String,
/// }
///
/// let err = assert_approved_err(
///     || "x".parse::<u8>().map_err(|_| ParseError { input: "x".into() }),
///     &SnapshotMatcher::new(),
///     &test_context!(),
/// );
/// assert_eq!(err.input, "x");
/// ```
///
/// # Panics
///
/// Panics with [`NO_ERROR_MESSAGE`] when `action` succeeds, when the error
/// cannot be serialized, and as [`assert_approved`] when it does not match.
pub fn assert_approved_err<T, E, F>(action: F, matcher: &SnapshotMatcher, context: &TestContext) -> E
where
    F: FnOnce() -> Result<T, E>,
    E: Serialize,
{
    let err = match action() {
        Ok(_) => panic!("{}", NO_ERROR_MESSAGE),
        Err(err) => err,
    };
    let actual = match Value::from_serialize(&err) {
        Ok(value) => value,
        Err(e) => panic!("{}", e),
    };
    assert_approved(actual, matcher, context);
    err
}

fn failure_report(outcome: &MatchOutcome) -> String {
    match outcome.description() {
        Some(description) => description.report(),
        None => outcome.message(),
    }
}
