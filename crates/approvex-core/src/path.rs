//! Field paths
//!
//! A path is a dot separated list of field names, each optionally followed by
//! bracketed indices: `order.lines[2].sku`, `matrix[0][1]`. Parsing is shared
//! by the ignore filter, the sort step and custom matcher resolution.

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Name(String),
    Index(usize),
}

/// Parse a dotted path. Returns `None` for malformed input (empty names,
/// unclosed brackets, non-numeric indices).
pub fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        let (name, mut rest) = match part.find('[') {
            Some(pos) => part.split_at(pos),
            None => (part, ""),
        };
        if name.is_empty() {
            // A leading index is allowed only at the very start: "[0].name"
            if !(segments.is_empty() && !rest.is_empty()) {
                return None;
            }
        } else {
            segments.push(Segment::Name(name.to_string()));
        }
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[')?;
            let close = inner.find(']')?;
            let index = inner[..close].trim().parse::<usize>().ok()?;
            segments.push(Segment::Index(index));
            rest = &inner[close + 1..];
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// Resolve a path against an object graph.
///
/// Never fails: a malformed path or a missing segment resolves to `None`.
pub fn find_value_at(path: &str, root: &Value) -> Option<Value> {
    let segments = parse_path(path)?;
    let mut current = root.clone();
    for segment in &segments {
        current = match segment {
            Segment::Name(name) => current.named_child(name)?,
            Segment::Index(index) => current.indexed_child(*index)?,
        };
    }
    Some(current)
}
