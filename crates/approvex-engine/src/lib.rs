//! ApproveX Engine - Orchestration layer
//!
//! Ties the pure document pipeline in `approvex-core` to the approval files
//! managed by `approvex-store`. [`SnapshotMatcher`] runs one match attempt
//! per call and reports a [`MatchOutcome`]; [`assert_approved`] turns that
//! outcome into a test panic. [`assert_approved_err`] does the same for the
//! error returned by a fallible action.

pub mod assert;
pub mod context;
pub mod outcome;
pub mod snapshot_matcher;

pub use approvex_core;
pub use approvex_store;

pub use assert::{assert_approved, assert_approved_err, assert_approved_with_reason};
pub use context::context_from_type_name;
pub use outcome::{FieldMismatch, MatchOutcome, MismatchDescription};
pub use snapshot_matcher::SnapshotMatcher;
