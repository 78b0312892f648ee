//! Tree builder: ingests nested JSON objects into a snapshot.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::entry::{Entry, Leaf, Node};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::tree::Tree;

/// Name given to the root when none is configured.
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Constructs snapshots from nested key/value input.
///
/// Objects become container nodes; every other value (null, booleans,
/// numbers, strings and arrays) becomes a leaf holding the value's JSON text.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    root_name: String,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_NAME)
    }
}

impl TreeBuilder {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
        }
    }

    /// Build a tree from a JSON value, which must be an object.
    #[instrument(level = "debug", skip(self, value))]
    pub fn build_from_value(&self, value: &Value) -> TreeResult<Tree> {
        match value {
            Value::Object(map) => Ok(self.build_from_map(map)),
            other => Err(TreeError::NotAnObject {
                found: kind_of(other),
            }),
        }
    }

    /// Build a tree from an object; keys keep their input order.
    pub fn build_from_map(&self, map: &Map<String, Value>) -> Tree {
        let root = build_level(Node::new(self.root_name.clone(), 0), map);
        debug!(
            "built tree '{}' with {} top-level entries",
            root.name(),
            root.children().len()
        );
        Tree::from_root(root)
    }
}

fn build_level(mut node: Node, map: &Map<String, Value>) -> Node {
    let depth = node.depth() + 1;
    for (key, value) in map {
        let child = match value {
            Value::Object(nested) => Entry::node(build_level(Node::new(key.clone(), depth), nested)),
            scalar => Entry::leaf(Leaf::new(key.clone(), leaf_content(scalar), depth)),
        };
        node.children.push(child);
    }
    node
}

/// Canonical JSON text of a non-object value.
pub fn leaf_content(value: &Value) -> String {
    // Serializing a `Value` cannot fail: keys are strings and numbers are finite.
    serde_json::to_string(value).unwrap_or_default()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
