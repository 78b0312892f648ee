//! Domain layer: the tree model and the edit engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod diff;
pub mod entry;
pub mod error;
pub mod intent;
pub mod path;
pub mod tree;

pub use builder::{leaf_content, TreeBuilder, DEFAULT_ROOT_NAME};
pub use diff::{diff, Change, ChangeKind, SnapshotDiff};
pub use entry::{Entry, Leaf, Node};
pub use error::{Rejection, TreeError, TreeResult};
pub use intent::{EditIntent, IntentParseError, NewEntry};
pub use path::NodePath;
pub use tree::{Edit, Tree, TreeIter};
