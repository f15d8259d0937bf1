//! Ignore-path filter over parsed documents.
//!
//! Object members at an ignored path are deleted. Array slots addressed by
//! index are overwritten with [`MARKER`] instead of being removed, so that
//! other indexed paths still point at the slots they were written for. The
//! markers are stripped from the rendered text by [`remove_markers`].

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::path::{parse_path, Segment};
use crate::value::Document;

/// Placeholder for a removed array slot.
pub const MARKER: &str = "__approvex_removed_slot__";

/// Return a copy of `document` without the subtrees addressed by `paths`.
///
/// Name segments apply to every element when they meet an array, so
/// `items.price` removes the price of each item. Malformed paths are ignored.
pub fn find_paths(document: &Document, paths: &BTreeSet<String>) -> Document {
    let mut filtered = document.clone();
    for path in paths {
        if let Some(segments) = parse_path(path) {
            remove_at(&mut filtered, &segments);
        }
    }
    filtered
}

fn remove_at(node: &mut Document, segments: &[Segment]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    match (head, node) {
        (Segment::Name(name), Document::Object(map)) => {
            if rest.is_empty() {
                map.remove(name);
            } else if let Some(child) = map.get_mut(name) {
                remove_at(child, rest);
            }
        }
        (Segment::Name(_), Document::Array(items)) => {
            for item in items {
                remove_at(item, segments);
            }
        }
        (Segment::Index(index), Document::Array(items)) => {
            if let Some(slot) = items.get_mut(*index) {
                if rest.is_empty() {
                    *slot = Document::String(MARKER.to_string());
                } else {
                    remove_at(slot, rest);
                }
            }
        }
        _ => {}
    }
}

fn marker_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let quoted = regex::escape(&format!("\"{}\"", MARKER));
        [
            // leading or middle element, together with its trailing comma
            compile(&format!(r"{}\s*,\s*", quoted)),
            // last element, together with the preceding comma
            compile(&format!(r",\s*{}", quoted)),
            // only element
            compile(&format!(r"\s*{}\s*", quoted)),
        ]
    })
}

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // The pattern is built from an escaped constant.
        Err(e) => unreachable!("marker pattern failed to compile: {}", e),
    }
}

/// Strip marker elements (and their separators) from rendered JSON text.
pub fn remove_markers(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in marker_patterns() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned
}
