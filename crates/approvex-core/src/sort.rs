//! Order normalization for arrays whose element order is not significant.
//!
//! Arrays are selected either by dotted path or by the name of the field that
//! holds them. Elements are ordered by their compact JSON text, which is
//! stable because object keys render in sorted order.

use std::collections::BTreeSet;

use crate::matchers::NamePattern;
use crate::path::{parse_path, Segment};
use crate::value::Document;

/// Return a copy of `document` with the selected arrays sorted.
pub fn sort_document(
    document: &Document,
    paths: &BTreeSet<String>,
    patterns: &[Box<dyn NamePattern>],
) -> Document {
    let mut sorted = document.clone();
    if !patterns.is_empty() {
        sort_by_pattern(&mut sorted, patterns);
    }

    // Deepest paths first so an outer array is ordered by its final contents.
    let mut parsed: Vec<Vec<Segment>> = paths.iter().filter_map(|p| parse_path(p)).collect();
    parsed.sort_by_key(|segments| std::cmp::Reverse(segments.len()));
    for segments in &parsed {
        sort_at(&mut sorted, segments);
    }
    sorted
}

fn sort_by_pattern(node: &mut Document, patterns: &[Box<dyn NamePattern>]) {
    match node {
        Document::Object(map) => {
            for (name, child) in map.iter_mut() {
                sort_by_pattern(child, patterns);
                if child.is_array() && patterns.iter().any(|p| p.matches_name(name)) {
                    sort_array(child);
                }
            }
        }
        Document::Array(items) => {
            for item in items {
                sort_by_pattern(item, patterns);
            }
        }
        _ => {}
    }
}

fn sort_at(node: &mut Document, segments: &[Segment]) {
    let Some((head, rest)) = segments.split_first() else {
        sort_array(node);
        return;
    };
    match (head, node) {
        (Segment::Name(name), Document::Object(map)) => {
            if let Some(child) = map.get_mut(name) {
                sort_at(child, rest);
            }
        }
        (Segment::Name(_), Document::Array(items)) => {
            for item in items {
                sort_at(item, segments);
            }
        }
        (Segment::Index(index), Document::Array(items)) => {
            if let Some(child) = items.get_mut(*index) {
                sort_at(child, rest);
            }
        }
        _ => {}
    }
}

fn sort_array(node: &mut Document) {
    if let Document::Array(items) = node {
        items.sort_by_cached_key(|item| item.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::{name_equals, name_matches};
    use serde_json::json;

    fn paths(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorts_array_at_path() {
        let doc = json!({"list": [3, 1, 2], "other": [3, 1, 2]});
        let sorted = sort_document(&doc, &paths(&["list"]), &[]);
        assert_eq!(sorted, json!({"list": [1, 2, 3], "other": [3, 1, 2]}));
    }

    #[test]
    fn test_path_traverses_arrays() {
        let doc = json!({"orders": [{"tags": ["b", "a"]}, {"tags": ["d", "c"]}]});
        let sorted = sort_document(&doc, &paths(&["orders.tags"]), &[]);
        assert_eq!(
            sorted,
            json!({"orders": [{"tags": ["a", "b"]}, {"tags": ["c", "d"]}]})
        );
    }

    #[test]
    fn test_sorts_by_field_name_pattern_at_any_depth() {
        let doc = json!({"a": {"ids": [2, 1]}, "ids": [9, 8], "keep": [2, 1]});
        let patterns: Vec<Box<dyn NamePattern>> = vec![Box::new(name_equals("ids"))];
        let sorted = sort_document(&doc, &BTreeSet::new(), &patterns);
        assert_eq!(sorted, json!({"a": {"ids": [1, 2]}, "ids": [8, 9], "keep": [2, 1]}));
    }

    #[test]
    fn test_pattern_reaches_only_named_arrays() {
        let doc = json!({"groups": [[3, 2], [1, 0]]});
        let patterns: Vec<Box<dyn NamePattern>> = vec![Box::new(name_matches("gr.*").unwrap())];
        let sorted = sort_document(&doc, &BTreeSet::new(), &patterns);
        assert_eq!(sorted, json!({"groups": [[1, 0], [3, 2]]}));
    }

    #[test]
    fn test_inner_paths_sorted_before_outer() {
        let doc = json!({"groups": [[3, 2], [1, 0]]});
        let sorted = sort_document(&doc, &paths(&["groups", "groups[0]", "groups[1]"]), &[]);
        assert_eq!(sorted, json!({"groups": [[0, 1], [2, 3]]}));
    }

    #[test]
    fn test_sort_is_order_insensitive() {
        let a = sort_document(&json!({"l": [{"k": 2}, {"k": 1}]}), &paths(&["l"]), &[]);
        let b = sort_document(&json!({"l": [{"k": 1}, {"k": 2}]}), &paths(&["l"]), &[]);
        assert_eq!(a, b);
    }
}
