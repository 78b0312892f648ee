//! Property tests for the edit engine over generated inputs.

use proptest::prelude::*;
use serde_json::{Map, Value};

use snaptree::domain::{Entry, Leaf, NodePath, Tree, TreeBuilder};

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
        Just(Value::Null),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop::collection::btree_map("[a-z]{1,3}", inner, 0..5)
            .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
    })
}

fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,3}", json_value(), 0..6)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
}

fn build(value: &Value) -> Tree {
    TreeBuilder::default()
        .build_from_value(value)
        .expect("generated input is an object")
}

/// Paths of all container nodes, the root included.
fn node_paths(tree: &Tree) -> Vec<NodePath> {
    tree.iter()
        .filter(|(_, entry)| entry.is_node())
        .map(|(path, _)| path)
        .collect()
}

proptest! {
    #[test]
    fn depth_equals_path_length(value in json_object()) {
        let tree = build(&value);
        for (path, entry) in tree.iter() {
            prop_assert_eq!(entry.depth(), path.depth());
        }
    }

    #[test]
    fn add_then_remove_restores_structure(value in json_object(), pick in any::<prop::sample::Index>()) {
        let tree = build(&value);
        let parents = node_paths(&tree);
        let parent = pick.get(&parents[..]).clone();
        // generated names never contain '_'
        let added = tree
            .add_child_at(Some(&parent), Entry::leaf(Leaf::new("new_leaf", "1", 0)))
            .unwrap();
        prop_assert!(added.is_applied());

        let restored = added
            .tree()
            .remove_at(&parent.join("new_leaf"))
            .unwrap()
            .into_tree();
        prop_assert_eq!(&restored, &tree);
    }

    #[test]
    fn remove_of_placed_handle_restores_structure(value in json_object(), pick in any::<prop::sample::Index>()) {
        let tree = build(&value);
        let parents = node_paths(&tree);
        let parent_path = pick.get(&parents[..]).clone();
        let parent = tree
            .get(&parent_path)
            .and_then(|e| e.as_node().cloned())
            .expect("picked a node");

        let added = tree
            .add_child(Some(&parent), Entry::leaf(Leaf::new("new_leaf", "1", 0)))
            .unwrap();
        let placed = added.placed().cloned().expect("applied add places the entry");
        prop_assert_eq!(placed.depth(), parent_path.depth() + 1);

        let restored = added.tree().remove_child(&placed).unwrap().into_tree();
        prop_assert_eq!(&restored, &tree);
    }

    #[test]
    fn edit_shares_every_subtree_off_the_path(value in json_object(), pick in any::<prop::sample::Index>()) {
        let tree = build(&value);
        let before = tree.to_string();
        let parents = node_paths(&tree);
        let parent = pick.get(&parents[..]).clone();

        let next = tree
            .add_child_at(Some(&parent), Entry::leaf(Leaf::new("new_leaf", "1", 0)))
            .unwrap()
            .into_tree();

        for (path, old_entry) in tree.iter() {
            let on_path = parent.segments().starts_with(path.segments());
            let new_entry = next.get(&path).expect("old entries survive an add");
            prop_assert_eq!(new_entry.ptr_eq(&old_entry), !on_path, "path {}", path);
        }
        prop_assert_eq!(tree.to_string(), before);
        prop_assert_eq!(next.len(), tree.len() + 1);
    }
}
