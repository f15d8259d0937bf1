//! Snapshot matcher with boundary logging.
//!
//! One call to [`SnapshotMatcher::matches`] is one match attempt:
//!
//! 1. detect reference cycles in the actual value
//! 2. resolve the approval file
//! 3. on first run, write the not-approved candidate and stop
//! 4. load and parse the approved file
//! 5. run custom field matchers; any failure stops the attempt
//! 6. normalize both documents (filter, sort) and compare them strictly;
//!    paths owned by custom matchers are filtered like ignored paths
//!
//! ## Logging Ownership
//!
//! The engine owns lifecycle logging for match attempts:
//! - `log_op_start!` at entry
//! - `log_op_end!` with the terminal outcome
//! - `log_op_error!` on environment failures
//!
//! The store only emits `tracing::debug!()` for file level details.

use std::collections::BTreeSet;
use std::time::Instant;

use approvex_core_types::AttemptId;
use approvex_core::compare::{compare_json, CompareMode};
use approvex_core::config::{MatchConfiguration, SkipRule};
use approvex_core::cycle::classes_with_circular_references;
use approvex_core::errors::{ExError, Result};
use approvex_core::filter::{find_paths, remove_markers};
use approvex_core::matchers::{Matcher, NamePattern};
use approvex_core::path::find_value_at;
use approvex_core::serializer::{JsonConfiguration, JsonSerializer};
use approvex_core::sort::sort_document;
use approvex_core::value::{Document, Value};
use approvex_core::{log_op_end, log_op_error, log_op_start};
use approvex_store::files::fs_store::ApprovalFileStore;
use approvex_store::naming::{ApprovalFileReference, FileNameOverrides, TestContext};

use crate::outcome::{FieldMismatch, MatchOutcome, MismatchDescription};

const OP_MATCH: &str = "match_snapshot";

/// Matches an actual value against its approved snapshot.
///
/// Built with chained calls, then used for any number of attempts. Each
/// attempt recomputes hashes, cycles and documents from scratch.
#[derive(Debug, Default)]
pub struct SnapshotMatcher {
    config: MatchConfiguration,
    overrides: FileNameOverrides,
    json_configuration: Option<JsonConfiguration>,
    store: ApprovalFileStore,
}

impl SnapshotMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- builder ----

    /// Leave out the subtree at a dotted path on both sides.
    pub fn ignoring_path(mut self, path: impl Into<String>) -> Self {
        self.config.add_path_to_ignore(path);
        self
    }

    pub fn ignoring_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.add_paths_to_ignore(paths);
        self
    }

    /// Leave out every object of this type when serializing the actual value.
    pub fn ignoring_type(mut self, type_name: impl Into<String>) -> Self {
        self.config.add_type_to_ignore(type_name);
        self
    }

    /// Leave out fields whose name matches when serializing the actual value.
    pub fn ignoring_pattern(mut self, pattern: impl NamePattern + 'static) -> Self {
        self.config.add_pattern_to_ignore(pattern);
        self
    }

    /// Compare the array at a dotted path without regard to order.
    pub fn sorting_path(mut self, path: impl Into<String>) -> Self {
        self.config.add_path_to_sort(path);
        self
    }

    /// Compare arrays held by matching field names without regard to order.
    pub fn sorting_pattern(mut self, pattern: impl NamePattern + 'static) -> Self {
        self.config.add_pattern_to_sort(pattern);
        self
    }

    /// Check the value at a dotted path with a matcher instead of the
    /// approved snapshot. The path is left out of the document comparison.
    /// A later matcher for the same path replaces the earlier one.
    pub fn with_matcher(mut self, path: impl Into<String>, matcher: impl Matcher + 'static) -> Self {
        self.config.add_custom_matcher(path, matcher);
        self
    }

    /// Use this directory instead of the hashed class directory.
    pub fn with_path_name(mut self, path_name: impl Into<String>) -> Self {
        self.overrides.path_name = Some(path_name.into());
        self
    }

    /// Use this base name instead of the hashed method name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.overrides.file_name = Some(file_name.into());
        self
    }

    /// Distinguish several snapshots taken by one test.
    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.overrides.unique_id = Some(unique_id.into());
        self
    }

    pub fn with_json_configuration(mut self, configuration: JsonConfiguration) -> Self {
        self.json_configuration = Some(configuration);
        self
    }

    /// Exempt matching values from circular reference detection.
    pub fn skip_circular_reference_check(mut self, rule: SkipRule) -> Self {
        self.config.add_skip_circular_reference_check(rule);
        self
    }

    /// Approval file extension, `json` by default.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.store = ApprovalFileStore::new(extension);
        self
    }

    // ---- accessors ----

    pub fn configuration(&self) -> &MatchConfiguration {
        &self.config
    }

    /// In-place access for callers that build the rules incrementally.
    pub fn configuration_mut(&mut self) -> &mut MatchConfiguration {
        &mut self.config
    }

    pub fn overrides(&self) -> &FileNameOverrides {
        &self.overrides
    }

    /// Approval file this matcher uses for `context`.
    pub fn locate(&self, context: &TestContext) -> ApprovalFileReference {
        self.store.locate(context, &self.overrides)
    }

    // ---- evaluation ----

    /// Run one match attempt.
    ///
    /// Assertion failures (first run, custom matcher, structural mismatch,
    /// unparsable JSON) are returned as [`MatchOutcome`] variants.
    ///
    /// # Errors
    ///
    /// Environment failures only:
    /// - `ApprovedFileUnreadable`: approved file present but unreadable
    /// - `NotApprovedFileUnwritable`: first-run candidate could not be written
    /// - `UnresolvedCycle`: a cycle runs through a type hidden from detection
    pub fn matches(&self, actual: &Value, context: &TestContext) -> Result<MatchOutcome> {
        let attempt_id = AttemptId::new();
        log_op_start!(
            OP_MATCH,
            attempt_id = attempt_id.as_str(),
            test_class = context.class_name.as_str(),
            test_method = context.method_name.as_str()
        );
        let start = Instant::now();

        let circular_types =
            classes_with_circular_references(actual, self.config.skip_circular_reference_check());
        let reference = self.locate(context);
        let approved_file = reference.approved_path().display().to_string();

        match self.evaluate(actual, &reference, &circular_types) {
            Ok(outcome) => {
                log_op_end!(
                    OP_MATCH,
                    duration_ms = start.elapsed().as_millis() as u64,
                    attempt_id = attempt_id.as_str(),
                    approved_file = approved_file.as_str(),
                    outcome = outcome.kind(),
                    circular_types_len = circular_types.len() as u64,
                    custom_matchers_len = self.config.custom_matchers().len() as u64
                );
                Ok(outcome)
            }
            Err(e) => {
                log_op_error!(
                    OP_MATCH,
                    ExError::from(e.clone()).with_attempt_id(attempt_id.clone()),
                    duration_ms = start.elapsed().as_millis() as u64,
                    attempt_id = attempt_id.as_str(),
                    approved_file = approved_file.as_str()
                );
                Err(e)
            }
        }
    }

    /// What a matching value looks like: the filtered approved text, then
    /// one `and <path> <description>` line per custom matcher.
    ///
    /// # Errors
    ///
    /// Returns `ApprovedFileUnreadable` if the approved file exists but
    /// cannot be read.
    pub fn describe(&self, context: &TestContext) -> Result<String> {
        let reference = self.locate(context);
        let mut description = String::new();

        if self.store.exists(&reference) {
            let text = self.store.read_approved(&reference)?;
            match serde_json::from_str::<Document>(&text) {
                Ok(expected) => {
                    let circular = BTreeSet::new();
                    let serializer = self.serializer(&circular);
                    description.push_str(&self.canonical_text(&expected, &serializer)?);
                }
                Err(_) => description.push_str(text.trim_end()),
            }
        }

        for (path, matcher) in self.config.custom_matchers() {
            description.push_str(&format!("\nand {} {}", path, matcher.describe()));
        }
        Ok(description)
    }

    fn serializer<'a>(&'a self, circular_types: &'a BTreeSet<String>) -> JsonSerializer<'a> {
        JsonSerializer::new(
            self.config.types_to_ignore(),
            self.config.patterns_to_ignore(),
            circular_types,
            self.json_configuration.clone(),
        )
    }

    fn evaluate(
        &self,
        actual: &Value,
        reference: &ApprovalFileReference,
        circular_types: &BTreeSet<String>,
    ) -> Result<MatchOutcome> {
        let serializer = self.serializer(circular_types);

        // First run: write the candidate and stop.
        if !self.store.exists(reference) {
            return self.create_not_approved(actual, reference, &serializer);
        }

        let approved_text = self.store.read_approved(reference)?;
        let expected = match serde_json::from_str::<Document>(&approved_text) {
            Ok(document) => document,
            Err(e) => {
                return Ok(MatchOutcome::ParseFailure(MismatchDescription::text(
                    self.assert_message(reference, &format!("Unable to parse approved JSON: {}", e)),
                )));
            }
        };

        let failures = self.custom_matcher_failures(actual, &serializer)?;
        if !failures.is_empty() {
            let explanation = failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(MatchOutcome::CustomMatcherFailed {
                failures,
                description: MismatchDescription::text(explanation),
            });
        }

        let expected_text = self.canonical_text(&expected, &serializer)?;

        if actual.is_null() {
            return Ok(MatchOutcome::Mismatch(MismatchDescription::comparison(
                expected_text,
                "null",
                "actual was null",
            )));
        }

        let actual_document = match actual_document(actual, &serializer)? {
            Ok(document) => document,
            Err(parse_message) => {
                return Ok(MatchOutcome::ParseFailure(MismatchDescription::text(
                    self.assert_message(reference, &parse_message),
                )));
            }
        };
        let actual_text = self.canonical_text(&actual_document, &serializer)?;

        let outcome = match compare_json(&expected_text, &actual_text, CompareMode::Strict) {
            Ok(result) if result.passed() => MatchOutcome::Matched,
            Ok(result) => MatchOutcome::Mismatch(MismatchDescription::comparison(
                expected_text,
                actual_text,
                self.assert_message(reference, &result.message()),
            )),
            Err(failure) => MatchOutcome::ParseFailure(MismatchDescription::comparison(
                expected_text,
                actual_text,
                self.assert_message(reference, &failure.to_string()),
            )),
        };
        Ok(outcome)
    }

    fn create_not_approved(
        &self,
        actual: &Value,
        reference: &ApprovalFileReference,
        serializer: &JsonSerializer<'_>,
    ) -> Result<MatchOutcome> {
        let document = match actual_document(actual, serializer)? {
            Ok(document) => document,
            Err(parse_message) => {
                return Ok(MatchOutcome::ParseFailure(MismatchDescription::text(
                    parse_message,
                )));
            }
        };
        let content = remove_markers(&serializer.to_text(&document)?);

        let created = self.store.write_not_approved(reference, &content)?;
        let message = format!(
            "Not approved file created '{}', please verify its contents and rename it to '{}'.",
            reference.display_name(&created),
            reference.approved_file_name()
        );
        Ok(MatchOutcome::NotApprovedCreated {
            file: reference.not_approved_path(),
            message,
        })
    }

    fn custom_matcher_failures(
        &self,
        actual: &Value,
        serializer: &JsonSerializer<'_>,
    ) -> Result<Vec<FieldMismatch>> {
        let mut failures = Vec::new();
        for (path, matcher) in self.config.custom_matchers() {
            let value = if actual.is_null() {
                Value::Null
            } else {
                find_value_at(path, actual).unwrap_or(Value::Null)
            };
            if matcher.matches(&value) {
                continue;
            }
            let snippet = if value.is_primitive() || value.is_null() {
                None
            } else {
                Some(serializer.render(&value)?)
            };
            failures.push(FieldMismatch {
                path: path.clone(),
                mismatch: matcher.describe_mismatch(&value),
                snippet,
            });
        }
        Ok(failures)
    }

    /// Paths left out of the document comparison: the ignored paths plus
    /// every path owned by a custom matcher.
    fn comparison_ignore_paths(&self) -> BTreeSet<String> {
        let mut paths = self.config.paths_to_ignore().clone();
        paths.extend(self.config.custom_matchers().keys().cloned());
        paths
    }

    /// Filter, sort and render a document. Ignored members are removed
    /// before sorting so they never influence element order.
    fn canonical_text(&self, document: &Document, serializer: &JsonSerializer<'_>) -> Result<String> {
        let filtered = find_paths(document, &self.comparison_ignore_paths());
        let sorted = sort_document(
            &filtered,
            self.config.paths_to_sort(),
            self.config.patterns_to_sort(),
        );
        Ok(remove_markers(&serializer.to_text(&sorted)?))
    }

    fn assert_message(&self, reference: &ApprovalFileReference, detail: &str) -> String {
        format!(
            "Expected file {}\n{}",
            reference.display_name(&reference.approved_file_name()),
            detail
        )
    }
}

/// Document for the actual value. A root string is JSON text and is parsed
/// rather than encoded as a string; the inner error carries the parser
/// message.
fn actual_document(
    actual: &Value,
    serializer: &JsonSerializer<'_>,
) -> Result<std::result::Result<Document, String>> {
    match actual {
        Value::String(text) => Ok(serde_json::from_str::<Document>(text)
            .map_err(|e| format!("Unable to parse actual JSON: {}", e))),
        other => Ok(Ok(serializer.to_document(other)?)),
    }
}
