//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::path::NodePath;

/// Domain errors represent broken invariants.
///
/// They abort an edit: the caller handed the engine a node, path or input
/// that does not belong to the snapshot it claims to belong to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("entry not part of this snapshot: {name}")]
    NotInTree { name: String },

    #[error("entry already part of this snapshot: {name}")]
    AlreadyInTree { name: String },

    #[error("path not found: {0}")]
    PathNotFound(NodePath),

    #[error("not a container node: {0}")]
    NotAContainer(NodePath),

    #[error("broken path while rebuilding ancestors: '{child}' is not a child of '{parent}'")]
    BrokenTrail { parent: String, child: String },

    #[error("empty path: nothing to rebuild")]
    EmptyTrail,

    #[error("ingestion input must be an object, got {found}")]
    NotAnObject { found: &'static str },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Why an edit left the snapshot unchanged.
///
/// Rejections are expected outcomes of user input, reported but never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("'{parent}' already has a child named '{name}'")]
    DuplicateName { parent: String, name: String },

    #[error("the root node cannot be removed")]
    RootRemoval,

    #[error("a leaf cannot become the root: '{name}'")]
    LeafAsRoot { name: String },
}
