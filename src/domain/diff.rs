//! Change detection between two snapshots.
//!
//! Walks both snapshots in parallel and stops at the first shared object:
//! an entry with unchanged identity has an unchanged subtree, so nothing
//! below it is examined.

use std::fmt;

use crate::domain::entry::Entry;
use crate::domain::path::NodePath;
use crate::domain::tree::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Present only in the new snapshot.
    Added,
    /// Present only in the old snapshot.
    Removed,
    /// Leaf content differs, or a node became a leaf or vice versa.
    Modified,
    /// New object with the same own content (an ancestor of an edit).
    Rebuilt,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ChangeKind::Added => "+",
            ChangeKind::Removed => "-",
            ChangeKind::Modified => "~",
            ChangeKind::Rebuilt => "*",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub path: NodePath,
    pub kind: ChangeKind,
}

/// Result of [`diff`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Changes in pre-order of the walk.
    pub changes: Vec<Change>,
    /// Number of subtrees reused by identity; their contents were skipped.
    pub shared: usize,
}

impl SnapshotDiff {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn paths_of(&self, kind: ChangeKind) -> Vec<&NodePath> {
        self.changes
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| &c.path)
            .collect()
    }
}

/// Compare two snapshots by identity.
///
/// Children are matched by name, which is unique among siblings.
pub fn diff(old: &Tree, new: &Tree) -> SnapshotDiff {
    let mut out = SnapshotDiff::default();
    compare(NodePath::root(), &old.root_entry(), &new.root_entry(), &mut out);
    out
}

fn compare(path: NodePath, old: &Entry, new: &Entry, out: &mut SnapshotDiff) {
    if old.ptr_eq(new) {
        out.shared += 1;
        return;
    }
    match (old, new) {
        (Entry::Node(before), Entry::Node(after)) => {
            out.changes.push(Change {
                path: path.clone(),
                kind: ChangeKind::Rebuilt,
            });
            for child in before.children() {
                let child_path = path.join(child.name());
                match after.child(child.name()) {
                    Some(counterpart) => compare(child_path, child, counterpart, out),
                    None => out.changes.push(Change {
                        path: child_path,
                        kind: ChangeKind::Removed,
                    }),
                }
            }
            for child in after.children() {
                if !before.has_child(child.name()) {
                    out.changes.push(Change {
                        path: path.join(child.name()),
                        kind: ChangeKind::Added,
                    });
                }
            }
        }
        (Entry::Leaf(before), Entry::Leaf(after)) => {
            let kind = if before.content() == after.content() {
                ChangeKind::Rebuilt
            } else {
                ChangeKind::Modified
            };
            out.changes.push(Change { path, kind });
        }
        _ => out.changes.push(Change {
            path,
            kind: ChangeKind::Modified,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TreeBuilder;
    use serde_json::json;

    fn sample() -> Tree {
        TreeBuilder::default()
            .build_from_value(&json!({"a": {"b": 1, "c": "hello"}, "d": 2}))
            .unwrap()
    }

    #[test]
    fn given_same_snapshot_when_diffing_then_unchanged() {
        let tree = sample();
        let result = diff(&tree, &tree.clone());
        assert!(result.is_unchanged());
        assert_eq!(result.shared, 1);
    }

    #[test]
    fn given_equal_but_rebuilt_snapshot_when_diffing_then_reports_every_object() {
        let old = sample();
        let new = sample();
        let result = diff(&old, &new);
        assert_eq!(result.shared, 0);
        assert_eq!(result.paths_of(ChangeKind::Rebuilt).len(), 5);
    }

    #[test]
    fn given_added_leaf_when_diffing_then_only_path_is_examined() {
        let old = sample();
        let new = old
            .apply(&"leaf:a/e=1".parse().unwrap())
            .unwrap()
            .into_tree();
        let result = diff(&old, &new);

        assert_eq!(result.paths_of(ChangeKind::Added), vec![&NodePath::new(["a", "e"])]);
        assert_eq!(
            result.paths_of(ChangeKind::Rebuilt),
            vec![&NodePath::root(), &NodePath::new(["a"])]
        );
        // b, c and d are reused
        assert_eq!(result.shared, 3);
    }

    #[test]
    fn given_removed_node_when_diffing_then_reports_removal() {
        let old = sample();
        let new = old.apply(&"rm:a".parse().unwrap()).unwrap().into_tree();
        let result = diff(&old, &new);
        assert_eq!(result.paths_of(ChangeKind::Removed), vec![&NodePath::new(["a"])]);
        assert_eq!(result.shared, 1);
    }
}
