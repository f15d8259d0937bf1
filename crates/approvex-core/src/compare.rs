//! Structural JSON comparison.
//!
//! Both sides are parsed and walked together. Object key order never matters.
//! In [`CompareMode::Strict`] array order matters and extra object members
//! are failures; [`CompareMode::Lenient`] tolerates both. Every discrepancy
//! is recorded with its path so the explanation points at the exact field.

use std::fmt;

use crate::value::Document;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompareMode {
    /// Exact structure: no extra members, array order significant.
    Strict,
    /// Actual may carry extra members; arrays compare as multisets.
    Lenient,
}

/// Which text failed to parse.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Expected,
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Expected => write!(f, "expected"),
            Side::Actual => write!(f, "actual"),
        }
    }
}

/// One side was not valid JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub side: Side,
    pub message: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unable to parse {} JSON: {}", self.side, self.message)
    }
}

impl std::error::Error for ParseFailure {}

/// A single discrepancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// Both sides have a value at `path` but they differ.
    Value {
        path: String,
        expected: String,
        actual: String,
    },
    /// Expected member absent from actual.
    Missing { path: String, field: String },
    /// Actual member absent from expected.
    Unexpected { path: String, field: String },
    /// Arrays of different length.
    Length {
        path: String,
        expected: usize,
        actual: usize,
    },
    /// Lenient mode: no actual element matches an expected one.
    NoMatch { path: String, element: String },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::Value {
                path,
                expected,
                actual,
            } => {
                if !path.is_empty() {
                    writeln!(f, "{}", path)?;
                }
                write!(f, "Expected: {}\n     got: {}", expected, actual)
            }
            Difference::Missing { path, field } => {
                if !path.is_empty() {
                    writeln!(f, "{}", path)?;
                }
                write!(f, "Expected: {}\n     but none found", field)
            }
            Difference::Unexpected { path, field } => {
                if !path.is_empty() {
                    writeln!(f, "{}", path)?;
                }
                write!(f, "Unexpected: {}", field)
            }
            Difference::Length {
                path,
                expected,
                actual,
            } => write!(
                f,
                "{}[]: Expected {} values but got {}",
                path, expected, actual
            ),
            Difference::NoMatch { path, element } => {
                write!(f, "{}[]: Expected {}, but none found", path, element)
            }
        }
    }
}

/// Outcome of a successful parse on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareResult {
    differences: Vec<Difference>,
}

impl CompareResult {
    pub fn passed(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn failed(&self) -> bool {
        !self.passed()
    }

    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    /// Human readable explanation, one discrepancy per paragraph.
    pub fn message(&self) -> String {
        self.differences
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Parse both texts and compare them structurally.
///
/// # Errors
///
/// Returns a [`ParseFailure`] naming the side that is not valid JSON.
pub fn compare_json(
    expected: &str,
    actual: &str,
    mode: CompareMode,
) -> std::result::Result<CompareResult, ParseFailure> {
    let expected: Document = serde_json::from_str(expected).map_err(|e| ParseFailure {
        side: Side::Expected,
        message: e.to_string(),
    })?;
    let actual: Document = serde_json::from_str(actual).map_err(|e| ParseFailure {
        side: Side::Actual,
        message: e.to_string(),
    })?;
    Ok(compare_documents(&expected, &actual, mode))
}

/// Compare two already parsed documents.
pub fn compare_documents(expected: &Document, actual: &Document, mode: CompareMode) -> CompareResult {
    let mut comparator = Comparator {
        mode,
        differences: Vec::new(),
    };
    comparator.compare("", expected, actual);
    CompareResult {
        differences: comparator.differences,
    }
}

struct Comparator {
    mode: CompareMode,
    differences: Vec<Difference>,
}

impl Comparator {
    fn compare(&mut self, path: &str, expected: &Document, actual: &Document) {
        match (expected, actual) {
            (Document::Object(exp), Document::Object(act)) => {
                for (key, exp_child) in exp {
                    match act.get(key) {
                        Some(act_child) => self.compare(&child_path(path, key), exp_child, act_child),
                        None => self.differences.push(Difference::Missing {
                            path: path.to_string(),
                            field: key.clone(),
                        }),
                    }
                }
                if self.mode == CompareMode::Strict {
                    for key in act.keys().filter(|k| !exp.contains_key(*k)) {
                        self.differences.push(Difference::Unexpected {
                            path: path.to_string(),
                            field: key.clone(),
                        });
                    }
                }
            }
            (Document::Array(exp), Document::Array(act)) => {
                if exp.len() != act.len() {
                    self.differences.push(Difference::Length {
                        path: path.to_string(),
                        expected: exp.len(),
                        actual: act.len(),
                    });
                    return;
                }
                match self.mode {
                    CompareMode::Strict => {
                        for (index, (e, a)) in exp.iter().zip(act).enumerate() {
                            self.compare(&format!("{}[{}]", path, index), e, a);
                        }
                    }
                    CompareMode::Lenient => self.compare_unordered(path, exp, act),
                }
            }
            (Document::Number(e), Document::Number(a)) => {
                let equal = e == a || matches!((e.as_f64(), a.as_f64()), (Some(x), Some(y)) if x == y);
                if !equal {
                    self.push_value(path, expected, actual);
                }
            }
            _ => {
                if expected != actual {
                    self.push_value(path, expected, actual);
                }
            }
        }
    }

    fn compare_unordered(&mut self, path: &str, expected: &[Document], actual: &[Document]) {
        let mut used = vec![false; actual.len()];
        for exp in expected {
            let found = actual.iter().enumerate().position(|(i, act)| {
                !used[i] && compare_documents(exp, act, self.mode).passed()
            });
            match found {
                Some(i) => used[i] = true,
                None => self.differences.push(Difference::NoMatch {
                    path: path.to_string(),
                    element: describe(exp),
                }),
            }
        }
    }

    fn push_value(&mut self, path: &str, expected: &Document, actual: &Document) {
        let (expected, actual) = if same_kind(expected, actual) {
            (describe(expected), describe(actual))
        } else {
            (kind_name(expected).to_string(), kind_name(actual).to_string())
        };
        self.differences.push(Difference::Value {
            path: path.to_string(),
            expected,
            actual,
        });
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn same_kind(a: &Document, b: &Document) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

fn kind_name(value: &Document) -> &'static str {
    match value {
        Document::Null => "null",
        Document::Bool(_) => "a boolean",
        Document::Number(_) => "a number",
        Document::String(_) => "a string",
        Document::Array(_) => "a JSON array",
        Document::Object(_) => "a JSON object",
    }
}

fn describe(value: &Document) -> String {
    match value {
        Document::String(s) => s.clone(),
        other => other.to_string(),
    }
}
