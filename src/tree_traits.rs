//! Pretty rendering of snapshots via `termtree`.

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::{Entry, Tree};

pub trait TreeConvert {
    /// Render as a `termtree`; leaves show their content when `with_content` is set.
    fn to_term_tree(&self, with_content: bool) -> TermTree<String>;
}

impl TreeConvert for Entry {
    fn to_term_tree(&self, with_content: bool) -> TermTree<String> {
        match self {
            Entry::Node(node) => {
                let leaves: Vec<_> = node
                    .children()
                    .iter()
                    .map(|c| c.to_term_tree(with_content))
                    .collect();
                TermTree::new(format!("{}/", node.name())).with_leaves(leaves)
            }
            Entry::Leaf(leaf) if with_content => {
                TermTree::new(format!("{}: {}", leaf.name(), leaf.content()))
            }
            Entry::Leaf(leaf) => TermTree::new(leaf.name().to_string()),
        }
    }
}

impl TreeConvert for Tree {
    #[instrument(level = "debug", skip(self))]
    fn to_term_tree(&self, with_content: bool) -> TermTree<String> {
        self.root_entry().to_term_tree(with_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TreeBuilder;
    use serde_json::json;

    #[test]
    fn given_tree_when_rendering_then_lists_every_entry() {
        let tree = TreeBuilder::default()
            .build_from_value(&json!({"a": {"b": 1}, "d": "x"}))
            .unwrap();
        let rendered = tree.to_term_tree(true).to_string();
        assert!(rendered.starts_with("root/"));
        assert!(rendered.contains("a/"));
        assert!(rendered.contains("b: 1"));
        assert!(rendered.contains("d: \"x\""));
    }

    #[test]
    fn given_no_content_when_rendering_then_leaves_show_names_only() {
        let tree = TreeBuilder::default()
            .build_from_value(&json!({"d": "x"}))
            .unwrap();
        let rendered = tree.to_term_tree(false).to_string();
        assert!(rendered.contains("d"));
        assert!(!rendered.contains("\"x\""));
    }
}
