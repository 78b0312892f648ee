//! Ingestion of nested JSON objects into snapshots.

use rstest::rstest;
use serde_json::json;

use snaptree::domain::{Entry, NodePath, TreeBuilder, TreeError};

#[test]
fn given_nested_object_when_building_then_depths_follow_nesting() {
    let tree = TreeBuilder::default()
        .build_from_value(&json!({"a": {"b": 1, "c": "hello"}, "d": 2}))
        .unwrap();

    let root = tree.root();
    assert_eq!(root.name(), "root");
    assert_eq!(root.depth(), 0);
    assert_eq!(root.children().len(), 2);

    let a = root.children()[0].as_node().expect("a is a node");
    assert_eq!(a.name(), "a");
    assert_eq!(a.depth(), 1);
    assert_eq!(a.children()[0].depth(), 2);

    let b = a.children()[0].as_leaf().expect("b is a leaf");
    assert_eq!(b.content(), "1");
    let c = a.children()[1].as_leaf().expect("c is a leaf");
    assert_eq!(c.content(), "\"hello\"");

    let d = root.children()[1].as_leaf().expect("d is a leaf");
    assert_eq!(d.content(), "2");
}

#[test]
fn given_object_when_building_then_keys_keep_input_order() {
    let value: serde_json::Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": {}}"#).unwrap();
    let tree = TreeBuilder::default().build_from_value(&value).unwrap();
    let names: Vec<_> = tree.root().children().iter().map(Entry::name).collect();
    assert_eq!(names, vec!["z", "a", "m"]);
}

#[rstest]
#[case(json!(null), "null")]
#[case(json!(true), "true")]
#[case(json!(-3), "-3")]
#[case(json!("x"), "\"x\"")]
#[case(json!([1, 2]), "[1,2]")]
fn given_non_object_value_when_building_then_becomes_leaf_with_json_text(
    #[case] value: serde_json::Value,
    #[case] expected: &str,
) {
    let tree = TreeBuilder::default()
        .build_from_value(&json!({ "k": value }))
        .unwrap();
    let leaf = tree.get(&NodePath::new(["k"])).expect("k exists");
    assert_eq!(leaf.as_leaf().map(|l| l.content()), Some(expected));
}

#[test]
fn given_empty_object_value_when_building_then_becomes_empty_node() {
    let tree = TreeBuilder::default()
        .build_from_value(&json!({"empty": {}}))
        .unwrap();
    let empty = tree.get(&NodePath::new(["empty"])).unwrap();
    assert!(empty.is_node());
    assert!(empty.as_node().unwrap().children().is_empty());
}

#[rstest]
#[case(json!([1]), "array")]
#[case(json!("text"), "string")]
#[case(json!(null), "null")]
fn given_non_object_input_when_building_then_errors(
    #[case] value: serde_json::Value,
    #[case] found: &'static str,
) {
    let err = TreeBuilder::default().build_from_value(&value).unwrap_err();
    assert_eq!(err, TreeError::NotAnObject { found });
}

#[test]
fn given_custom_root_name_when_building_then_root_uses_it() {
    let tree = TreeBuilder::new("config")
        .build_from_value(&json!({"x": 1}))
        .unwrap();
    assert_eq!(tree.root().name(), "config");
    assert_eq!(tree.path_string(&NodePath::new(["x"])), "config/x");
}
