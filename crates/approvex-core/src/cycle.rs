//! Circular reference detection
//!
//! Walks an object graph depth first, keeping the identities of the object
//! nodes on the current path. Meeting one of them again means a back edge:
//! its type is recorded and the branch is not descended further. The result
//! tells the serializer which types to render as references instead of
//! expanding them.

use std::collections::{BTreeSet, HashSet};

use crate::config::{is_skipped, SkipRule};
use crate::value::Value;

/// Types of the object nodes that close a reference cycle reachable from
/// `root`. Values matched by any of `skip` are treated as leaves.
pub fn classes_with_circular_references(root: &Value, skip: &[SkipRule]) -> BTreeSet<String> {
    let mut detector = Detector {
        skip,
        active: HashSet::new(),
        circular: BTreeSet::new(),
    };
    detector.visit(root);
    detector.circular
}

struct Detector<'a> {
    skip: &'a [SkipRule],
    active: HashSet<usize>,
    circular: BTreeSet<String>,
}

impl Detector<'_> {
    fn visit(&mut self, value: &Value) {
        if is_skipped(self.skip, value) {
            return;
        }
        match value {
            Value::List(items) => {
                for item in items {
                    self.visit(item);
                }
            }
            Value::Object(obj) => {
                let id = obj.identity();
                if !self.active.insert(id) {
                    self.circular.insert(obj.type_name());
                    return;
                }
                for (_, child) in obj.fields() {
                    self.visit(&child);
                }
                self.active.remove(&id);
            }
            _ => {}
        }
    }
}
