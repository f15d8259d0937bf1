#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;

use approvex_core::config::SkipRule;
use approvex_core::cycle::classes_with_circular_references;
use approvex_core::filter::{find_paths, remove_markers};
use approvex_core::serializer::JsonSerializer;
use approvex_core::value::{Document, ObjectRef, Value};
use proptest::prelude::*;
use serde_json::json;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_leaf() -> impl Strategy<Value = Document> {
    prop_oneof![
        Just(Document::Null),
        any::<bool>().prop_map(Document::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        // quarters render and parse back exactly
        (-4000i32..4000).prop_map(|n| json!(f64::from(n) / 4.0)),
        "[a-z ]{0,8}".prop_map(Document::String),
    ]
}

fn arb_document() -> impl Strategy<Value = Document> {
    arb_leaf().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Document::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Document::Object(m.into_iter().collect())),
        ]
    })
}

fn defaults() -> Vec<SkipRule> {
    vec![SkipRule::path_like_values()]
}

/// Chain `T0 -> T1 -> ... -> Tn` linked through `child` fields.
fn chain(len: usize) -> Vec<ObjectRef> {
    let nodes: Vec<ObjectRef> = (0..len).map(|i| ObjectRef::new(format!("T{}", i))).collect();
    for pair in nodes.windows(2) {
        pair[0].set_field("child", pair[1].clone());
    }
    nodes
}

// ---------------------------------------------------------------------------
// Cycle detection
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn acyclic_graphs_have_no_circular_types(doc in arb_document()) {
        let value = Value::from(doc);
        prop_assert!(classes_with_circular_references(&value, &defaults()).is_empty());
    }

    #[test]
    fn back_edge_reports_ancestor_type((len, from, to) in (1usize..8).prop_flat_map(|len| {
        (Just(len), 0..len).prop_flat_map(|(len, from)| (Just(len), Just(from), 0..=from))
    })) {
        let nodes = chain(len);
        nodes[from].set_field("back", nodes[to].clone());
        let root = Value::Object(nodes[0].clone());

        let found = classes_with_circular_references(&root, &defaults());
        prop_assert!(found.contains(&format!("T{}", to)), "found {:?}", found);
    }
}

#[test]
fn test_cycle_through_list_detected() {
    let node = ObjectRef::new("Node");
    node.set_field("peers", vec![Value::from(1), Value::Object(node.clone())]);
    let found = classes_with_circular_references(&Value::Object(node), &defaults());
    assert!(found.contains("Node"));
}

#[test]
fn test_exempted_type_is_not_reported() {
    let nodes = chain(3);
    nodes[2].set_field("back", nodes[0].clone());
    let mut skip = defaults();
    skip.push(SkipRule::for_type("T2"));

    let found = classes_with_circular_references(&Value::Object(nodes[0].clone()), &skip);
    assert!(found.is_empty(), "T2 is a leaf, so the back edge is never followed");
}

// ---------------------------------------------------------------------------
// Path filter
// ---------------------------------------------------------------------------

fn render_filtered(doc: &Document, paths: &BTreeSet<String>) -> Document {
    let empty = BTreeSet::new();
    let ser = JsonSerializer::new(&[], &[], &empty, None);
    let text = remove_markers(&ser.to_text(&find_paths(doc, paths)).unwrap());
    serde_json::from_str(&text).unwrap()
}

proptest! {
    #[test]
    fn removed_slots_keep_sibling_positions(
        items in prop::collection::vec(any::<i32>(), 1..10),
        picks in prop::collection::btree_set(0usize..10, 0..4),
    ) {
        let doc = json!({"items": items.clone(), "keep": true});
        let picks: BTreeSet<usize> = picks.into_iter().filter(|i| *i < items.len()).collect();
        let paths: BTreeSet<String> = picks.iter().map(|i| format!("items[{}]", i)).collect();

        let filtered = render_filtered(&doc, &paths);

        let expected: Vec<i32> = items
            .iter()
            .enumerate()
            .filter(|(i, _)| !picks.contains(i))
            .map(|(_, v)| *v)
            .collect();
        prop_assert_eq!(filtered, json!({"items": expected, "keep": true}));
    }

    #[test]
    fn removed_members_are_absent(doc in prop::collection::btree_map("[a-z]{1,3}", arb_document(), 1..6)) {
        let keys: Vec<String> = doc.keys().cloned().collect();
        let removed = keys[0].clone();
        let object = Document::Object(doc.into_iter().collect());
        let paths: BTreeSet<String> = [removed.clone()].into_iter().collect();

        let filtered = render_filtered(&object, &paths);

        prop_assert!(filtered.get(&removed).is_none());
        for key in &keys[1..] {
            prop_assert_eq!(filtered.get(key), object.get(key));
        }
    }
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn serialize_parse_serialize_is_stable(doc in arb_document()) {
        let empty = BTreeSet::new();
        let ser = JsonSerializer::new(&[], &[], &empty, None);

        let first = ser.render(&Value::from(doc)).unwrap();
        let reparsed: Document = serde_json::from_str(&first).unwrap();
        let second = ser.to_text(&reparsed).unwrap();

        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_self_referencing_node_serializes_without_overflow() {
    let node = ObjectRef::new("Node").with_field("name", "root");
    node.set_field("self_ref", node.clone());
    let value = Value::Object(node);

    let circular = classes_with_circular_references(&value, &defaults());
    assert!(circular.contains("Node"));

    let ser = JsonSerializer::new(&[], &[], &circular, None);
    let doc = ser.to_document(&value).unwrap();
    assert_eq!(doc, json!({"name": "root", "self_ref": {"$ref": "Node"}}));
}
