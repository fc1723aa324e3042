//! Node tree invariant property tests.
//!
//! Transforms arbitrary JSON documents and checks that every produced tree:
//!
//! - never holds a value and children on the same node
//! - is identical across repeated transforms of the same input
//! - keeps source order for arrays and objects
//! - distinguishes explicit nulls from absent members

use hyperdoc_core::{Node, Scalar};
use hyperdoc_transform::{TransformConfig, Transformer};
use proptest::prelude::*;
use serde_json::Value;

/// Generate arbitrary JSON documents a few levels deep.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn transform(value: &Value) -> Node {
    Transformer::new(TransformConfig::default())
        .to_node_tree(value)
        .expect("json documents always transform")
}

proptest! {
    #[test]
    fn value_and_children_are_exclusive(doc in arb_json()) {
        let tree = transform(&doc);
        for node in tree.walk() {
            prop_assert!(node.value().is_none() || node.children().is_empty());
        }
    }

    #[test]
    fn transform_is_deterministic(doc in arb_json()) {
        prop_assert_eq!(transform(&doc), transform(&doc));
    }

    #[test]
    fn arrays_keep_non_null_elements_in_order(items in prop::collection::vec(
        prop_oneof![Just(Value::Null), any::<i32>().prop_map(Value::from)],
        0..16,
    )) {
        let tree = transform(&Value::Array(items.clone()));
        let expected: Vec<Scalar> = items
            .iter()
            .filter_map(Value::as_i64)
            .map(Scalar::from)
            .collect();
        let actual: Vec<Scalar> = tree.children().iter().filter_map(Node::value).cloned().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn object_members_map_to_named_children(
        map in prop::collection::btree_map("[a-z]{1,6}", prop::option::of(any::<bool>()), 0..8)
    ) {
        let doc = Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), v.map_or(Value::Null, Value::Bool)))
                .collect(),
        );
        let tree = transform(&doc);
        let names: Vec<&str> = tree.children().iter().filter_map(Node::name).collect();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        prop_assert_eq!(names, keys);

        for (key, value) in &map {
            let child = tree.child(key).expect("every key has a child");
            match value {
                Some(b) => prop_assert_eq!(child.value(), Some(&Scalar::Bool(*b))),
                None => prop_assert_eq!(child.value(), Some(&Scalar::Null)),
            }
        }
    }
}

#[test]
fn absent_and_null_members_differ() {
    let with_null = transform(&serde_json::json!({"a": 1, "b": null}));
    let without = transform(&serde_json::json!({"a": 1}));
    assert_eq!(with_null.children().len(), 2);
    assert_eq!(without.children().len(), 1);
    assert!(without.child("b").is_err());
}
