//! Snapshots and the path-copy edit engine.
//!
//! An edit never touches a published snapshot. It clones the edited node and
//! every ancestor up to the root, and carries all other children over by
//! pointer, so every subtree off the edited path keeps its identity.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use crate::domain::entry::{Entry, Node};
use crate::domain::error::{Rejection, TreeError, TreeResult};
use crate::domain::intent::EditIntent;
use crate::domain::path::NodePath;

/// One immutable snapshot: a root node reachable by a stable reference.
///
/// `==` compares structure, [`Tree::ptr_eq`] compares identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    root: Arc<Node>,
}

/// Outcome of an edit that did not hit a broken invariant.
#[must_use]
#[derive(Debug, Clone)]
pub enum Edit {
    /// A new snapshot; the input snapshot is untouched.
    ///
    /// `placed` is the added entry as it lives in `tree`. Its depth is
    /// recomputed on placement, so it may be a different object than the
    /// one handed in. `None` for removals.
    Applied { tree: Tree, placed: Option<Entry> },
    /// The input snapshot, returned unchanged.
    Rejected { tree: Tree, reason: Rejection },
}

impl Edit {
    pub fn tree(&self) -> &Tree {
        match self {
            Edit::Applied { tree, .. } => tree,
            Edit::Rejected { tree, .. } => tree,
        }
    }

    pub fn into_tree(self) -> Tree {
        match self {
            Edit::Applied { tree, .. } => tree,
            Edit::Rejected { tree, .. } => tree,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Edit::Applied { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Edit::Applied { .. } => None,
            Edit::Rejected { reason, .. } => Some(reason),
        }
    }

    /// Live handle of the added entry, usable for further edits on [`Edit::tree`].
    pub fn placed(&self) -> Option<&Entry> {
        match self {
            Edit::Applied { placed, .. } => placed.as_ref(),
            Edit::Rejected { .. } => None,
        }
    }
}

impl Tree {
    /// A root without children.
    pub fn empty(root_name: impl Into<String>) -> Self {
        Self::from_root(Node::new(root_name, 0))
    }

    /// Wrap `root` as a snapshot, placing it at depth 0.
    pub fn from_root(root: Node) -> Self {
        let root = if root.depth() == 0 { root } else { root.rebased(0) };
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// The root as a shared entry handle.
    pub fn root_entry(&self) -> Entry {
        Entry::Node(Arc::clone(&self.root))
    }

    /// Both snapshots share the same root object, hence the same content.
    pub fn ptr_eq(&self, other: &Tree) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    // ------------------------------------------------------------------
    // Paths
    // ------------------------------------------------------------------

    /// Chain of entries from the root down to `target`, both inclusive.
    ///
    /// Matches by identity; an entry from another snapshot is not found even
    /// if an equal entry exists here.
    #[instrument(level = "trace", skip_all, fields(target = target.name()))]
    pub fn path_of(&self, target: &Entry) -> Option<Vec<Entry>> {
        let mut trail = vec![self.root_entry()];
        if trail[0].ptr_eq(target) {
            return Some(trail);
        }
        if find_trail(&self.root, target, &mut trail) {
            Some(trail)
        } else {
            None
        }
    }

    /// Name path of `target`, `None` if it is not part of this snapshot.
    pub fn node_path(&self, target: &Entry) -> Option<NodePath> {
        self.path_of(target)
            .map(|trail| NodePath::new(trail.iter().skip(1).map(|e| e.name().to_string())))
    }

    /// Container holding `target`; `None` for the root or a foreign entry.
    pub fn parent_of(&self, target: &Entry) -> Option<Arc<Node>> {
        let trail = self.path_of(target)?;
        let parent = trail.len().checked_sub(2)?;
        trail[parent].as_node().cloned()
    }

    /// Chain of entries from the root down to the entry at `path`.
    pub fn resolve(&self, path: &NodePath) -> TreeResult<Vec<Entry>> {
        let mut trail = vec![self.root_entry()];
        let mut walked = NodePath::root();
        for name in path.segments() {
            let node = match trail.last() {
                Some(Entry::Node(node)) => Arc::clone(node),
                _ => return Err(TreeError::NotAContainer(walked)),
            };
            let child = node
                .child(name)
                .ok_or_else(|| TreeError::PathNotFound(path.clone()))?;
            trail.push(child.clone());
            walked = walked.join(name.as_str());
        }
        Ok(trail)
    }

    pub fn get(&self, path: &NodePath) -> Option<Entry> {
        self.resolve(path).ok().and_then(|mut trail| trail.pop())
    }

    /// Display form including the root name, e.g. `root/a/b`.
    pub fn path_string(&self, path: &NodePath) -> String {
        std::iter::once(self.root.name())
            .chain(path.segments().iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("/")
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Add `child` under `parent`, or make it the new root when `parent` is `None`.
    ///
    /// Rejected when the name is already taken among the parent's children,
    /// or when a leaf is offered as the root. Fails when `parent` is not part
    /// of this snapshot, or when `child` or one of its descendants already is.
    /// The placed entry is returned in [`Edit::placed`].
    #[instrument(level = "debug", skip_all, fields(child = child.name()))]
    pub fn add_child(&self, parent: Option<&Arc<Node>>, child: Entry) -> TreeResult<Edit> {
        let Some(parent) = parent else {
            return Ok(self.replace_root(child));
        };
        let parent_entry = Entry::Node(Arc::clone(parent));
        let trail = self
            .path_of(&parent_entry)
            .ok_or_else(|| TreeError::NotInTree {
                name: parent.name().to_string(),
            })?;
        self.add_along(&trail, child)
    }

    /// Remove `target` together with its subtree.
    ///
    /// Rejected for the root. Fails when `target` is not part of this snapshot.
    #[instrument(level = "debug", skip_all, fields(target = target.name()))]
    pub fn remove_child(&self, target: &Entry) -> TreeResult<Edit> {
        if target.ptr_eq(&self.root_entry()) {
            return Ok(self.reject(Rejection::RootRemoval));
        }
        let trail = self.path_of(target).ok_or_else(|| TreeError::NotInTree {
            name: target.name().to_string(),
        })?;
        self.remove_along(&trail)
    }

    /// [`Tree::add_child`] with the parent addressed by name path.
    pub fn add_child_at(&self, parent: Option<&NodePath>, child: Entry) -> TreeResult<Edit> {
        let Some(path) = parent else {
            return Ok(self.replace_root(child));
        };
        let trail = self.resolve(path)?;
        self.add_along(&trail, child)
    }

    /// [`Tree::remove_child`] with the target addressed by name path.
    pub fn remove_at(&self, path: &NodePath) -> TreeResult<Edit> {
        if path.is_root() {
            return Ok(self.reject(Rejection::RootRemoval));
        }
        let trail = self.resolve(path)?;
        self.remove_along(&trail)
    }

    /// Apply one edit intent.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&self, intent: &EditIntent) -> TreeResult<Edit> {
        match intent {
            EditIntent::AddChild { parent, entry } => {
                let depth = parent.as_ref().map_or(0, |p| p.depth() + 1);
                self.add_child_at(parent.as_ref(), entry.to_entry(depth))
            }
            EditIntent::RemoveChild { target } => self.remove_at(target),
        }
    }

    /// Rebuild the ancestor chain along `trail` with `replacement` at its end.
    ///
    /// `trail` runs from this snapshot's root to the node being replaced.
    /// Every level is cloned; every child off the trail is carried over by
    /// pointer. Depths are recomputed from trail positions.
    pub fn propagate_changes(&self, trail: &[Entry], replacement: Node) -> TreeResult<Tree> {
        let first = trail.first().ok_or(TreeError::EmptyTrail)?;
        if !first.ptr_eq(&self.root_entry()) {
            return Err(TreeError::NotInTree {
                name: first.name().to_string(),
            });
        }
        let root = rebuild_along(trail, 0, replacement)?;
        Ok(Tree {
            root: Arc::new(root),
        })
    }

    fn add_along(&self, trail: &[Entry], child: Entry) -> TreeResult<Edit> {
        let parent = trail_end_node(trail)?;
        if let Some(shared) = self.first_shared(&child) {
            return Err(TreeError::AlreadyInTree {
                name: shared.name().to_string(),
            });
        }
        if parent.has_child(child.name()) {
            return Ok(self.reject(Rejection::DuplicateName {
                parent: parent.name().to_string(),
                name: child.name().to_string(),
            }));
        }
        // trail.len() - 1 is the parent's depth
        let child = child.rebased(trail.len());
        let mut replacement = Node::clone(parent);
        replacement.children.push(child.clone());
        let tree = self.propagate_changes(trail, replacement)?;
        debug!("added entry, tree now has {} entries", tree.len());
        Ok(Edit::Applied {
            tree,
            placed: Some(child),
        })
    }

    fn remove_along(&self, trail: &[Entry]) -> TreeResult<Edit> {
        let (target, parent_trail) = trail.split_last().ok_or(TreeError::EmptyTrail)?;
        let parent = trail_end_node(parent_trail)?;
        let mut replacement = Node::clone(parent);
        replacement.children.retain(|c| !c.ptr_eq(target));
        let tree = self.propagate_changes(parent_trail, replacement)?;
        debug!("removed entry, tree now has {} entries", tree.len());
        Ok(Edit::Applied { tree, placed: None })
    }

    fn replace_root(&self, child: Entry) -> Edit {
        match child {
            Entry::Node(node) => {
                debug!("replacing root '{}' with '{}'", self.root.name(), node.name());
                let root = if node.depth() == 0 {
                    node
                } else {
                    Arc::new(node.rebased(0))
                };
                Edit::Applied {
                    placed: Some(Entry::Node(Arc::clone(&root))),
                    tree: Tree { root },
                }
            }
            Entry::Leaf(leaf) => self.reject(Rejection::LeafAsRoot {
                name: leaf.name().to_string(),
            }),
        }
    }

    /// First entry of `candidate`'s subtree (pre-order) that is already part
    /// of this snapshot. Adding it would give one object two parents.
    fn first_shared(&self, candidate: &Entry) -> Option<Entry> {
        let known: HashSet<*const ()> = self.iter().map(|(_, e)| e.addr()).collect();
        let mut stack = vec![candidate.clone()];
        while let Some(entry) = stack.pop() {
            if known.contains(&entry.addr()) {
                return Some(entry);
            }
            if let Entry::Node(node) = &entry {
                stack.extend(node.children().iter().rev().cloned());
            }
        }
        None
    }

    fn reject(&self, reason: Rejection) -> Edit {
        warn!("edit rejected: {}", reason);
        Edit::Rejected {
            tree: self.clone(),
            reason,
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Pre-order, left-to-right walk yielding each entry with its name path.
    pub fn iter(&self) -> TreeIter {
        TreeIter {
            stack: vec![(NodePath::root(), self.root_entry())],
        }
    }

    /// Number of levels; a root without children has height 1.
    pub fn height(&self) -> usize {
        height_of(&self.root)
    }

    /// Number of entries, the root included.
    pub fn len(&self) -> usize {
        self.root_entry().size()
    }

    /// A snapshot always holds its root, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Paths of all leaves in walk order.
    pub fn leaf_paths(&self) -> Vec<NodePath> {
        self.iter()
            .filter(|(_, entry)| !entry.is_node())
            .map(|(path, _)| path)
            .collect()
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}

/// Iterator returned by [`Tree::iter`].
pub struct TreeIter {
    stack: Vec<(NodePath, Entry)>,
}

impl Iterator for TreeIter {
    type Item = (NodePath, Entry);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, entry) = self.stack.pop()?;
        if let Entry::Node(node) = &entry {
            // Push children in reverse order for left-to-right traversal
            for child in node.children().iter().rev() {
                self.stack.push((path.join(child.name()), child.clone()));
            }
        }
        Some((path, entry))
    }
}

fn find_trail(node: &Node, target: &Entry, trail: &mut Vec<Entry>) -> bool {
    for child in node.children() {
        trail.push(child.clone());
        if child.ptr_eq(target) {
            return true;
        }
        if let Entry::Node(inner) = child {
            if find_trail(inner, target, trail) {
                return true;
            }
        }
        trail.pop();
    }
    false
}

fn trail_end_node(trail: &[Entry]) -> TreeResult<&Arc<Node>> {
    let last = trail.last().ok_or(TreeError::EmptyTrail)?;
    last.as_node().ok_or_else(|| {
        TreeError::NotAContainer(NodePath::new(
            trail.iter().skip(1).map(|e| e.name().to_string()),
        ))
    })
}

fn rebuild_along(trail: &[Entry], position: usize, replacement: Node) -> TreeResult<Node> {
    if position == trail.len() - 1 {
        if replacement.depth() == position {
            return Ok(replacement);
        }
        return Ok(replacement.rebased(position));
    }
    let next = &trail[position + 1];
    let broken = || TreeError::BrokenTrail {
        parent: trail[position].name().to_string(),
        child: next.name().to_string(),
    };
    let original = trail[position].as_node().ok_or_else(broken)?;
    let index = original.position_of(next).ok_or_else(broken)?;
    trace!("rebuilding '{}' at depth {}, child index {}", original.name(), position, index);

    let rebuilt = rebuild_along(trail, position + 1, replacement)?;
    let mut children = Vec::with_capacity(original.children().len());
    children.extend_from_slice(&original.children()[..index]);
    children.push(Entry::node(rebuilt));
    children.extend_from_slice(&original.children()[index + 1..]);

    Ok(Node {
        name: original.name().to_string(),
        depth: position,
        children,
    })
}

fn height_of(node: &Node) -> usize {
    1 + node
        .children()
        .iter()
        .map(|child| match child {
            Entry::Node(inner) => height_of(inner),
            Entry::Leaf(_) => 1,
        })
        .max()
        .unwrap_or(0)
}
