//! Object graph value model.
//!
//! [`Value`] is what a match attempt inspects: a tree of primitives, lists and
//! shared object nodes. Object nodes are reference counted, so the same node
//! can appear in several places and a node can (directly or indirectly)
//! refer back to one of its ancestors. Identity is the node allocation, not
//! its contents.
//!
//! Values are built either by hand through [`ObjectRef`] (needed whenever the
//! graph has shared nodes or cycles) or from anything that implements
//! `serde::Serialize` via [`Value::from_serialize`].

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;
use serde_json::Number;

use crate::errors::Result;

/// Parsed JSON document.
pub type Document = serde_json::Value;

/// Type name given to objects converted from untyped JSON.
pub const UNTYPED_OBJECT: &str = "object";

/// Coarse classification of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Path,
    List,
    Object,
}

impl ValueKind {
    /// Type name used for non-object values.
    pub fn type_name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Path => "path",
            ValueKind::List => "list",
            ValueKind::Object => UNTYPED_OBJECT,
        }
    }
}

/// A node in an actual-value graph.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Filesystem path. Serialized as a string.
    Path(PathBuf),
    List(Vec<Value>),
    Object(ObjectRef),
}

impl Value {
    /// Convert any serializable value into a graph value.
    ///
    /// The root object takes the short Rust type name of `T`; nested objects
    /// are untyped because serde does not expose their names.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let document = serde_json::to_value(value)?;
        let converted = Value::from(document);
        if let Value::Object(obj) = &converted {
            obj.set_type_name(short_type_name(std::any::type_name::<T>()));
        }
        Ok(converted)
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Path(_) => ValueKind::Path,
            Value::List(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Type name used for type-based ignoring and cycle reporting.
    pub fn type_name(&self) -> String {
        match self {
            Value::Object(obj) => obj.type_name(),
            other => other.kind().type_name().to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for scalars, including paths.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Path(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Named child of an object node.
    pub fn named_child(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.field(name),
            _ => None,
        }
    }

    /// Indexed child of a list.
    pub fn indexed_child(&self, index: usize) -> Option<Value> {
        match self {
            Value::List(items) => items.get(index).cloned(),
            _ => None,
        }
    }
}

/// Shorten `my_crate::model::Order<T>` to `Order`.
fn short_type_name(full: &str) -> String {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
        .trim_start_matches('&')
        .to_string()
}

/// Object node contents.
#[derive(Debug, Default)]
struct Object {
    type_name: String,
    fields: Vec<(String, Value)>,
}

/// Shared handle to an object node.
///
/// Cloning the handle does not clone the node; both handles have the same
/// [`identity`](ObjectRef::identity).
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(Object {
            type_name: type_name.into(),
            fields: Vec::new(),
        })))
    }

    /// Builder form of [`set_field`](ObjectRef::set_field).
    pub fn with_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Insert or replace a field, keeping first-insertion order.
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        let mut node = self.0.borrow_mut();
        match node.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => node.fields.push((name, value)),
        }
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.0
            .borrow()
            .fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Snapshot of the fields in declaration order.
    pub fn fields(&self) -> Vec<(String, Value)> {
        self.0.borrow().fields.clone()
    }

    pub fn type_name(&self) -> String {
        self.0.borrow().type_name.clone()
    }

    fn set_type_name(&self, type_name: String) {
        self.0.borrow_mut().type_name = type_name;
    }

    /// Allocation identity of the node.
    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// Graphs may be cyclic, so Debug never descends into fields.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:x}", self.type_name(), self.identity())
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        match document {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(b),
            Document::Number(n) => Value::Number(n),
            Document::String(s) => Value::String(s),
            Document::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Document::Object(map) => {
                let obj = ObjectRef::new(UNTYPED_OBJECT);
                for (name, child) in map {
                    obj.set_field(name, Value::from(child));
                }
                Value::Object(obj)
            }
        }
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<PathBuf> for Value {
    fn from(p: PathBuf) -> Self {
        Value::Path(p)
    }
}

impl From<&Path> for Value {
    fn from(p: &Path) -> Self {
        Value::Path(p.to_path_buf())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
