//! Persistent JSON-shaped trees.
//!
//! Every edit returns a new [`domain::Tree`] that shares all untouched
//! subtrees with its predecessor; only the entries on the path from the root
//! to the edited node are rebuilt.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
