//! Match configuration
//!
//! The rule bag one snapshot matcher owns. Rules are accumulated before the
//! attempt and only read while it runs. Set-like collections ignore duplicate
//! inserts; list-like collections append and keep insertion order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::matchers::{Matcher, NamePattern};
use crate::value::Value;

/// Name of the built-in cycle exemption for filesystem paths.
pub const PATH_LIKE_VALUES: &str = "path-like-values";

/// Named predicate exempting values from circular reference detection.
///
/// An exempted value is treated as a leaf: the detector neither records it
/// on the active path nor looks inside it.
pub struct SkipRule {
    name: String,
    predicate: Box<dyn Fn(&Value) -> bool>,
}

impl SkipRule {
    pub fn new(name: impl Into<String>, predicate: impl Fn(&Value) -> bool + 'static) -> Self {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Exempts every instance of the given object type.
    pub fn for_type(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let name = format!("type:{}", type_name);
        Self::new(name, move |value| match value {
            Value::Object(obj) => obj.type_name() == type_name,
            _ => false,
        })
    }

    /// Built-in rule exempting `Value::Path`.
    pub fn path_like_values() -> Self {
        Self::new(PATH_LIKE_VALUES, |value| matches!(value, Value::Path(_)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn applies_to(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for SkipRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SkipRule").field(&self.name).finish()
    }
}

/// True when any rule exempts `value`.
pub fn is_skipped(rules: &[SkipRule], value: &Value) -> bool {
    rules.iter().any(|rule| rule.applies_to(value))
}

pub struct MatchConfiguration {
    paths_to_ignore: BTreeSet<String>,
    custom_matchers: BTreeMap<String, Box<dyn Matcher>>,
    types_to_ignore: Vec<String>,
    patterns_to_ignore: Vec<Box<dyn NamePattern>>,
    patterns_to_sort: Vec<Box<dyn NamePattern>>,
    paths_to_sort: BTreeSet<String>,
    skip_circular_reference_check: Vec<SkipRule>,
}

impl Default for MatchConfiguration {
    fn default() -> Self {
        Self {
            paths_to_ignore: BTreeSet::new(),
            custom_matchers: BTreeMap::new(),
            types_to_ignore: Vec::new(),
            patterns_to_ignore: Vec::new(),
            patterns_to_sort: Vec::new(),
            paths_to_sort: BTreeSet::new(),
            skip_circular_reference_check: vec![SkipRule::path_like_values()],
        }
    }
}

impl MatchConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- paths to ignore ----

    pub fn add_path_to_ignore(&mut self, path: impl Into<String>) -> &mut Self {
        self.paths_to_ignore.insert(path.into());
        self
    }

    pub fn add_paths_to_ignore<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths_to_ignore.extend(paths.into_iter().map(Into::into));
        self
    }

    // ---- custom matchers ----

    /// Binds a matcher to a field path. A later call for the same path
    /// replaces the earlier matcher.
    pub fn add_custom_matcher(
        &mut self,
        path: impl Into<String>,
        matcher: impl Matcher + 'static,
    ) -> &mut Self {
        self.custom_matchers.insert(path.into(), Box::new(matcher));
        self
    }

    pub fn add_custom_matchers<I, S>(&mut self, matchers: I) -> &mut Self
    where
        I: IntoIterator<Item = (S, Box<dyn Matcher>)>,
        S: Into<String>,
    {
        self.custom_matchers
            .extend(matchers.into_iter().map(|(path, m)| (path.into(), m)));
        self
    }

    // ---- types to ignore ----

    pub fn add_type_to_ignore(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.types_to_ignore.push(type_name.into());
        self
    }

    pub fn add_types_to_ignore<I, S>(&mut self, type_names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types_to_ignore
            .extend(type_names.into_iter().map(Into::into));
        self
    }

    // ---- name patterns ----

    pub fn add_pattern_to_ignore(&mut self, pattern: impl NamePattern + 'static) -> &mut Self {
        self.patterns_to_ignore.push(Box::new(pattern));
        self
    }

    pub fn add_patterns_to_ignore<I>(&mut self, patterns: I) -> &mut Self
    where
        I: IntoIterator<Item = Box<dyn NamePattern>>,
    {
        self.patterns_to_ignore.extend(patterns);
        self
    }

    pub fn add_pattern_to_sort(&mut self, pattern: impl NamePattern + 'static) -> &mut Self {
        self.patterns_to_sort.push(Box::new(pattern));
        self
    }

    pub fn add_patterns_to_sort<I>(&mut self, patterns: I) -> &mut Self
    where
        I: IntoIterator<Item = Box<dyn NamePattern>>,
    {
        self.patterns_to_sort.extend(patterns);
        self
    }

    // ---- paths to sort ----

    pub fn add_path_to_sort(&mut self, path: impl Into<String>) -> &mut Self {
        self.paths_to_sort.insert(path.into());
        self
    }

    pub fn add_paths_to_sort<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths_to_sort.extend(paths.into_iter().map(Into::into));
        self
    }

    // ---- cycle exemptions ----

    pub fn add_skip_circular_reference_check(&mut self, rule: SkipRule) -> &mut Self {
        self.skip_circular_reference_check.push(rule);
        self
    }

    pub fn add_skip_circular_reference_checks<I>(&mut self, rules: I) -> &mut Self
    where
        I: IntoIterator<Item = SkipRule>,
    {
        self.skip_circular_reference_check.extend(rules);
        self
    }

    // ---- accessors ----

    pub fn paths_to_ignore(&self) -> &BTreeSet<String> {
        &self.paths_to_ignore
    }

    pub fn custom_matchers(&self) -> &BTreeMap<String, Box<dyn Matcher>> {
        &self.custom_matchers
    }

    pub fn types_to_ignore(&self) -> &[String] {
        &self.types_to_ignore
    }

    pub fn patterns_to_ignore(&self) -> &[Box<dyn NamePattern>] {
        &self.patterns_to_ignore
    }

    pub fn patterns_to_sort(&self) -> &[Box<dyn NamePattern>] {
        &self.patterns_to_sort
    }

    pub fn paths_to_sort(&self) -> &BTreeSet<String> {
        &self.paths_to_sort
    }

    pub fn skip_circular_reference_check(&self) -> &[SkipRule] {
        &self.skip_circular_reference_check
    }
}

impl fmt::Debug for MatchConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchConfiguration")
            .field("paths_to_ignore", &self.paths_to_ignore)
            .field("custom_matchers", &self.custom_matchers)
            .field("types_to_ignore", &self.types_to_ignore)
            .field("patterns_to_ignore", &self.patterns_to_ignore)
            .field("patterns_to_sort", &self.patterns_to_sort)
            .field("paths_to_sort", &self.paths_to_sort)
            .field(
                "skip_circular_reference_check",
                &self.skip_circular_reference_check,
            )
            .finish()
    }
}
