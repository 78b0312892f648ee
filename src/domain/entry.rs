//! Tree model: container nodes, leaf values and the entry sum type.
//!
//! Entries are immutable once shared. Children are held behind `Arc`, so
//! cloning a [`Node`] duplicates only its own fields and the child pointers;
//! every child subtree stays the same object.

use std::fmt;
use std::sync::Arc;

/// Terminal value: a name and a serialized payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub(crate) name: String,
    pub(crate) depth: usize,
    pub(crate) content: String,
}

impl Leaf {
    pub fn new(name: impl Into<String>, content: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            depth,
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}", indent(self.depth), self.name, self.content)
    }
}

/// Named container with an ordered list of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) depth: usize,
    pub(crate) children: Vec<Entry>,
}

impl Node {
    /// Empty container at `depth`.
    pub fn new(name: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            depth,
            children: Vec::new(),
        }
    }

    /// Appends `child`, placed one level below this node.
    ///
    /// Meant for assembling a fresh, unpublished subtree. Sibling names are
    /// not checked here; the edit engine checks them for every edit.
    pub fn with_child(mut self, child: Entry) -> Self {
        self.children.push(child.rebased(self.depth + 1));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn children(&self) -> &[Entry] {
        &self.children
    }

    /// Child with exactly this name (case-sensitive, no trimming).
    pub fn child(&self, name: &str) -> Option<&Entry> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    /// Index of `entry` among the children, compared by identity.
    pub fn position_of(&self, entry: &Entry) -> Option<usize> {
        self.children.iter().position(|c| c.ptr_eq(entry))
    }

    /// Copy of this subtree with every depth recomputed from `depth`.
    pub(crate) fn rebased(&self, depth: usize) -> Node {
        Node {
            name: self.name.clone(),
            depth,
            children: self.children.iter().map(|c| c.rebased(depth + 1)).collect(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/", indent(self.depth), self.name)?;
        for child in &self.children {
            write!(f, "\n{}", child)?;
        }
        Ok(())
    }
}

/// A child slot: either a container or a leaf.
///
/// `Clone` shares the subtree; use [`Entry::ptr_eq`] to compare identity and
/// `==` to compare structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Node(Arc<Node>),
    Leaf(Arc<Leaf>),
}

impl Entry {
    pub fn node(node: Node) -> Self {
        Entry::Node(Arc::new(node))
    }

    pub fn leaf(leaf: Leaf) -> Self {
        Entry::Leaf(Arc::new(leaf))
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Node(node) => node.name(),
            Entry::Leaf(leaf) => leaf.name(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Entry::Node(node) => node.depth(),
            Entry::Leaf(leaf) => leaf.depth(),
        }
    }

    pub fn as_node(&self) -> Option<&Arc<Node>> {
        match self {
            Entry::Node(node) => Some(node),
            Entry::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Arc<Leaf>> {
        match self {
            Entry::Node(_) => None,
            Entry::Leaf(leaf) => Some(leaf),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Entry::Node(_))
    }

    /// Same object, not just equal content.
    pub fn ptr_eq(&self, other: &Entry) -> bool {
        match (self, other) {
            (Entry::Node(a), Entry::Node(b)) => Arc::ptr_eq(a, b),
            (Entry::Leaf(a), Entry::Leaf(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Address of the shared object, for identity sets.
    pub(crate) fn addr(&self) -> *const () {
        match self {
            Entry::Node(node) => Arc::as_ptr(node) as *const (),
            Entry::Leaf(leaf) => Arc::as_ptr(leaf) as *const (),
        }
    }

    /// This entry placed at `depth`.
    ///
    /// Returns a shared handle when the depth already matches, otherwise a
    /// rebuilt subtree whose depths follow from `depth`.
    pub fn rebased(&self, depth: usize) -> Entry {
        if self.depth() == depth {
            return self.clone();
        }
        match self {
            Entry::Node(node) => Entry::node(node.rebased(depth)),
            Entry::Leaf(leaf) => Entry::leaf(Leaf {
                depth,
                ..Leaf::clone(leaf)
            }),
        }
    }

    /// Number of entries in this subtree, itself included.
    pub fn size(&self) -> usize {
        match self {
            Entry::Node(node) => 1 + node.children.iter().map(Entry::size).sum::<usize>(),
            Entry::Leaf(_) => 1,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Node(node) => node.fmt(f),
            Entry::Leaf(leaf) => leaf.fmt(f),
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
