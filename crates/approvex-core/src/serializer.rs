//! Object graph to canonical JSON.
//!
//! [`JsonSerializer`] turns a [`Value`] into a [`Document`] while applying the
//! serialization-time rules (ignored types, ignored field-name patterns,
//! null omission) and breaking reference cycles for the types the detector
//! reported. Documents are rendered as pretty printed text with object keys
//! in sorted order, which makes the text canonical.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Map;

use crate::errors::{ApprovalError, Result};
use crate::matchers::NamePattern;
use crate::value::{Document, Value};

/// Key of the placeholder object emitted where a cycle is broken.
pub const REF_KEY: &str = "$ref";

/// Serialization options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonConfiguration {
    /// Drop object members whose value is null.
    pub omit_null_fields: bool,
    /// Spaces per nesting level; 0 renders compact text.
    pub indent: usize,
}

impl Default for JsonConfiguration {
    fn default() -> Self {
        Self {
            omit_null_fields: false,
            indent: 2,
        }
    }
}

impl JsonConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_omit_null_fields(mut self, omit: bool) -> Self {
        self.omit_null_fields = omit;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Serializer bound to one match attempt's rules.
pub struct JsonSerializer<'a> {
    types_to_ignore: &'a [String],
    patterns_to_ignore: &'a [Box<dyn NamePattern>],
    circular_types: &'a BTreeSet<String>,
    configuration: JsonConfiguration,
}

impl<'a> JsonSerializer<'a> {
    pub fn new(
        types_to_ignore: &'a [String],
        patterns_to_ignore: &'a [Box<dyn NamePattern>],
        circular_types: &'a BTreeSet<String>,
        configuration: Option<JsonConfiguration>,
    ) -> Self {
        Self {
            types_to_ignore,
            patterns_to_ignore,
            circular_types,
            configuration: configuration.unwrap_or_default(),
        }
    }

    pub fn configuration(&self) -> &JsonConfiguration {
        &self.configuration
    }

    /// Convert an object graph into a document.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::UnresolvedCycle` when the graph loops back
    /// through a type that is not in the circular type set (for example
    /// because a skip rule hid it from the detector).
    pub fn to_document(&self, value: &Value) -> Result<Document> {
        let mut active = HashSet::new();
        self.convert(value, &mut active)
    }

    /// Render a document as canonical text.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::Serialization` if the writer fails.
    pub fn to_text(&self, document: &Document) -> Result<String> {
        if self.configuration.indent == 0 {
            return Ok(serde_json::to_string(document)?);
        }
        let indent = " ".repeat(self.configuration.indent);
        let mut out = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
        document.serialize(&mut ser)?;
        String::from_utf8(out).map_err(|e| ApprovalError::Serialization {
            message: e.to_string(),
        })
    }

    /// `to_document` followed by `to_text`.
    ///
    /// # Errors
    ///
    /// See [`to_document`](Self::to_document) and [`to_text`](Self::to_text).
    pub fn render(&self, value: &Value) -> Result<String> {
        let document = self.to_document(value)?;
        self.to_text(&document)
    }

    fn is_ignored_type(&self, value: &Value) -> bool {
        if self.types_to_ignore.is_empty() {
            return false;
        }
        let type_name = value.type_name();
        self.types_to_ignore.iter().any(|t| *t == type_name)
    }

    fn is_ignored_name(&self, name: &str) -> bool {
        self.patterns_to_ignore.iter().any(|p| p.matches_name(name))
    }

    fn convert(&self, value: &Value, active: &mut HashSet<usize>) -> Result<Document> {
        let document = match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Bool(*b),
            Value::Number(n) => Document::Number(n.clone()),
            Value::String(s) => Document::String(s.clone()),
            Value::Path(p) => Document::String(p.to_string_lossy().into_owned()),
            Value::List(items) => {
                let mut converted = Vec::with_capacity(items.len());
                for item in items.iter().filter(|item| !self.is_ignored_type(item)) {
                    converted.push(self.convert(item, active)?);
                }
                Document::Array(converted)
            }
            Value::Object(obj) => {
                let id = obj.identity();
                if active.contains(&id) {
                    let type_name = obj.type_name();
                    if !self.circular_types.contains(&type_name) {
                        return Err(ApprovalError::UnresolvedCycle { type_name });
                    }
                    let mut placeholder = Map::new();
                    placeholder.insert(REF_KEY.to_string(), Document::String(type_name));
                    return Ok(Document::Object(placeholder));
                }

                active.insert(id);
                let mut map = Map::new();
                for (name, child) in obj.fields() {
                    if self.is_ignored_name(&name) || self.is_ignored_type(&child) {
                        continue;
                    }
                    if child.is_null() && self.configuration.omit_null_fields {
                        continue;
                    }
                    let converted = self.convert(&child, active)?;
                    map.insert(name, converted);
                }
                active.remove(&id);
                Document::Object(map)
            }
        };
        Ok(document)
    }
}
