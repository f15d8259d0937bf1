//! approvex core - comparison kernel for approval testing
//!
//! This crate holds everything a match attempt needs that does not touch the
//! filesystem:
//! - the object graph value model and field-path resolution
//! - match configuration (ignore/sort rules, custom matchers, cycle exemptions)
//! - circular reference detection ahead of serialization
//! - serialization to canonical JSON text and the ignore-path filter
//! - structural JSON comparison with readable mismatch explanations
//! - the error and logging facilities shared by the other crates

pub use approvex_core_types;

pub mod compare;
pub mod config;
pub mod cycle;
pub mod errors;
pub mod filter;
pub mod logging_facility;
pub mod matchers;
pub mod path;
pub mod serializer;
pub mod sort;
pub mod value;

// Re-export commonly used types
pub use compare::{compare_json, CompareMode, CompareResult, ParseFailure};
pub use config::{MatchConfiguration, SkipRule};
pub use errors::{ApprovalError, ExError, ExErrorKind, Result};
pub use matchers::{Matcher, NamePattern};
pub use serializer::{JsonConfiguration, JsonSerializer};
pub use value::{Document, ObjectRef, Value, ValueKind};
