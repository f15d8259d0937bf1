//! Caller-supplied predicates.
//!
//! [`Matcher`] is bound to a field path and checked against the value found
//! there before the document comparison runs. [`NamePattern`] selects field
//! names for ignoring or sorting during serialization. Both are open traits:
//! the built-ins below cover equality, regex and kind checks, and any closure
//! of the right shape works too.

use std::fmt;

use regex::Regex;

use crate::errors::{ApprovalError, Result};
use crate::value::{Value, ValueKind};

/// Predicate over a resolved field value.
pub trait Matcher {
    fn matches(&self, actual: &Value) -> bool;

    /// What a matching value looks like, e.g. `"<42>"`.
    fn describe(&self) -> String;

    /// Why `actual` did not match.
    fn describe_mismatch(&self, actual: &Value) -> String {
        format!("was {}", describe_value(actual))
    }
}

/// Predicate over a field name.
pub trait NamePattern {
    fn matches_name(&self, name: &str) -> bool;

    fn describe(&self) -> String {
        "a custom name pattern".to_string()
    }
}

impl<F> NamePattern for F
where
    F: Fn(&str) -> bool,
{
    fn matches_name(&self, name: &str) -> bool {
        self(name)
    }
}

fn invalid_pattern(pattern: &str, err: regex::Error) -> ApprovalError {
    ApprovalError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    }
}

/// Short rendering of a value for mismatch text.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("<{}>", b),
        Value::Number(n) => format!("<{}>", n),
        Value::String(s) => format!("\"{}\"", s),
        Value::Path(p) => format!("<{}>", p.display()),
        Value::List(items) => format!("a list of {} item(s)", items.len()),
        Value::Object(obj) => format!("a {} object", obj.type_name()),
    }
}

// ---------------------------------------------------------------------------
// Value matchers
// ---------------------------------------------------------------------------

/// Equality against a scalar.
///
/// Numbers compare by value, so `equal_to(42)` accepts `42` and `42.0`.
pub struct EqualTo(Value);

pub fn equal_to(expected: impl Into<Value>) -> EqualTo {
    EqualTo(expected.into())
}

impl Matcher for EqualTo {
    fn matches(&self, actual: &Value) -> bool {
        match (&self.0, actual) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                a == b || matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y)
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Path(a), Value::String(b)) | (Value::String(b), Value::Path(a)) => {
                a.to_string_lossy() == b.as_str()
            }
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        describe_value(&self.0)
    }
}

/// String (or path) matching a regular expression anywhere in the text.
pub struct MatchesRegex(Regex);

/// # Errors
///
/// Returns `ApprovalError::InvalidPattern` when the pattern does not compile.
pub fn matches_regex(pattern: &str) -> Result<MatchesRegex> {
    let regex = Regex::new(pattern).map_err(|e| invalid_pattern(pattern, e))?;
    Ok(MatchesRegex(regex))
}

impl Matcher for MatchesRegex {
    fn matches(&self, actual: &Value) -> bool {
        match actual {
            Value::String(s) => self.0.is_match(s),
            Value::Path(p) => self.0.is_match(&p.to_string_lossy()),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!("a string matching /{}/", self.0.as_str())
    }
}

/// Value of a given kind.
pub struct IsKind(ValueKind);

pub fn is_kind(kind: ValueKind) -> IsKind {
    IsKind(kind)
}

impl Matcher for IsKind {
    fn matches(&self, actual: &Value) -> bool {
        actual.kind() == self.0
    }

    fn describe(&self) -> String {
        format!("a value of kind {}", self.0.type_name())
    }

    fn describe_mismatch(&self, actual: &Value) -> String {
        format!("was a {}", actual.kind().type_name())
    }
}

pub struct NotNull;

pub fn not_null() -> NotNull {
    NotNull
}

impl Matcher for NotNull {
    fn matches(&self, actual: &Value) -> bool {
        !actual.is_null()
    }

    fn describe(&self) -> String {
        "not null".to_string()
    }
}

/// Accepts everything. Useful to keep a volatile field out of the comparison
/// while still documenting it in `describe`.
pub struct AnyValue;

pub fn any_value() -> AnyValue {
    AnyValue
}

impl Matcher for AnyValue {
    fn matches(&self, _actual: &Value) -> bool {
        true
    }

    fn describe(&self) -> String {
        "anything".to_string()
    }
}

/// Closure-backed matcher with a fixed description.
pub struct FnMatcher<F> {
    description: String,
    predicate: F,
}

pub fn matcher_fn<F>(description: impl Into<String>, predicate: F) -> FnMatcher<F>
where
    F: Fn(&Value) -> bool,
{
    FnMatcher {
        description: description.into(),
        predicate,
    }
}

impl<F> Matcher for FnMatcher<F>
where
    F: Fn(&Value) -> bool,
{
    fn matches(&self, actual: &Value) -> bool {
        (self.predicate)(actual)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

// ---------------------------------------------------------------------------
// Name patterns
// ---------------------------------------------------------------------------

/// Exact field name.
pub struct NameEquals(String);

pub fn name_equals(name: impl Into<String>) -> NameEquals {
    NameEquals(name.into())
}

impl NamePattern for NameEquals {
    fn matches_name(&self, name: &str) -> bool {
        self.0 == name
    }

    fn describe(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

/// Field name fully matching a regular expression.
pub struct NameMatches(Regex);

/// # Errors
///
/// Returns `ApprovalError::InvalidPattern` when the pattern does not compile.
pub fn name_matches(pattern: &str) -> Result<NameMatches> {
    let regex =
        Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| invalid_pattern(pattern, e))?;
    Ok(NameMatches(regex))
}

impl From<Regex> for NameMatches {
    /// Wraps an already compiled regex. Matching is unanchored.
    fn from(regex: Regex) -> Self {
        NameMatches(regex)
    }
}

impl NamePattern for NameMatches {
    fn matches_name(&self, name: &str) -> bool {
        self.0.is_match(name)
    }

    fn describe(&self) -> String {
        format!("a name matching /{}/", self.0.as_str())
    }
}

impl fmt::Debug for dyn Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matcher({})", self.describe())
    }
}

impl fmt::Debug for dyn NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamePattern({})", self.describe())
    }
}
