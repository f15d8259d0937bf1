//! Terminal outcomes of a match attempt.

use std::fmt;
use std::path::PathBuf;

/// Diagnostic for a failed attempt.
///
/// When both canonical texts are known `comparison_failure` is set so a
/// runner can show a two-pane diff; `explanation` is always filled for
/// plain-text consumers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MismatchDescription {
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub explanation: String,
    pub comparison_failure: bool,
}

impl MismatchDescription {
    /// Description without texts to diff.
    pub fn text(explanation: impl Into<String>) -> Self {
        Self {
            explanation: explanation.into(),
            ..Default::default()
        }
    }

    /// Description carrying both canonical texts.
    pub fn comparison(
        expected: impl Into<String>,
        actual: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            expected: Some(expected.into()),
            actual: Some(actual.into()),
            explanation: explanation.into(),
            comparison_failure: true,
        }
    }

    /// Explanation followed by both texts when available.
    pub fn report(&self) -> String {
        match (&self.expected, &self.actual) {
            (Some(expected), Some(actual)) if self.comparison_failure => format!(
                "{}\n\nExpected:\n{}\n\nActual:\n{}",
                self.explanation, expected, actual
            ),
            _ => self.explanation.clone(),
        }
    }
}

impl fmt::Display for MismatchDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.explanation)
    }
}

/// A custom matcher that rejected its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    pub path: String,
    /// The matcher's mismatch text, e.g. `was <7>`.
    pub mismatch: String,
    /// Pretty JSON of the offending value when it is a list or object.
    pub snippet: Option<String>,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.mismatch)?;
        if let Some(snippet) = &self.snippet {
            write!(f, "\n{}", snippet)?;
        }
        Ok(())
    }
}

/// Exactly one of these ends every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched,
    /// First run: the candidate was written and nothing was compared.
    NotApprovedCreated { file: PathBuf, message: String },
    /// At least one custom matcher failed; the document diff was skipped.
    CustomMatcherFailed {
        failures: Vec<FieldMismatch>,
        description: MismatchDescription,
    },
    Mismatch(MismatchDescription),
    ParseFailure(MismatchDescription),
}

impl MatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched)
    }

    /// Stable name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MatchOutcome::Matched => "matched",
            MatchOutcome::NotApprovedCreated { .. } => "not_approved_created",
            MatchOutcome::CustomMatcherFailed { .. } => "custom_matcher_failed",
            MatchOutcome::Mismatch(_) => "mismatch",
            MatchOutcome::ParseFailure(_) => "parse_failure",
        }
    }

    pub fn description(&self) -> Option<&MismatchDescription> {
        match self {
            MatchOutcome::CustomMatcherFailed { description, .. }
            | MatchOutcome::Mismatch(description)
            | MatchOutcome::ParseFailure(description) => Some(description),
            _ => None,
        }
    }

    /// Plain-text failure message; empty for a match.
    pub fn message(&self) -> String {
        match self {
            MatchOutcome::Matched => String::new(),
            MatchOutcome::NotApprovedCreated { message, .. } => message.clone(),
            other => other
                .description()
                .map(|d| d.explanation.clone())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Matched => f.write_str("matched"),
            other => f.write_str(&other.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_sets_flag_and_report_includes_texts() {
        let description = MismatchDescription::comparison("{}", "[]", "boom");
        assert!(description.comparison_failure);
        assert_eq!(description.to_string(), "boom");
        assert_eq!(description.report(), "boom\n\nExpected:\n{}\n\nActual:\n[]");
    }

    #[test]
    fn test_text_only_description() {
        let description = MismatchDescription::text("Unable to parse");
        assert!(!description.comparison_failure);
        assert_eq!(description.report(), "Unable to parse");
    }

    #[test]
    fn test_field_mismatch_display() {
        let plain = FieldMismatch {
            path: "user.id".to_string(),
            mismatch: "was <7>".to_string(),
            snippet: None,
        };
        assert_eq!(plain.to_string(), "user.id was <7>");

        let with_snippet = FieldMismatch {
            snippet: Some("[\n  1\n]".to_string()),
            ..plain
        };
        assert_eq!(with_snippet.to_string(), "user.id was <7>\n[\n  1\n]");
    }

    #[test]
    fn test_outcome_kinds_and_messages() {
        assert!(MatchOutcome::Matched.is_match());
        assert_eq!(MatchOutcome::Matched.message(), "");

        let created = MatchOutcome::NotApprovedCreated {
            file: PathBuf::from("a-not-approved.json"),
            message: "created".to_string(),
        };
        assert_eq!(created.kind(), "not_approved_created");
        assert_eq!(created.message(), "created");
        assert!(created.description().is_none());

        let mismatch = MatchOutcome::Mismatch(MismatchDescription::text("diff"));
        assert_eq!(mismatch.to_string(), "diff");
    }
}
