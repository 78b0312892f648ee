//! Snapshot service
//!
//! Loads JSON input into a snapshot and applies edit intents one at a time,
//! each edit consuming the previous snapshot.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{diff, Edit, EditIntent, Rejection, SnapshotDiff, Tree, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// Input path that means "read standard input".
pub const STDIN_SOURCE: &str = "-";

/// Outcome of applying a batch of intents.
#[derive(Debug, Clone)]
pub struct EditReport {
    /// Snapshot before the first intent
    pub before: Tree,
    /// Snapshot after the last intent
    pub after: Tree,
    /// Number of intents that produced a new snapshot
    pub applied: usize,
    /// Intents that left the snapshot unchanged, with the reason
    pub rejected: Vec<(EditIntent, Rejection)>,
}

impl EditReport {
    /// Identity-based changes from `before` to `after`.
    pub fn diff(&self) -> SnapshotDiff {
        diff(&self.before, &self.after)
    }
}

/// Service for loading snapshots and dispatching edits.
pub struct SnapshotService {
    fs: Arc<dyn FileSystem>,
    builder: TreeBuilder,
}

impl SnapshotService {
    /// Create a new snapshot service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: &Settings) -> Self {
        Self {
            fs,
            builder: TreeBuilder::new(settings.root_name.clone()),
        }
    }

    /// Load a JSON document from `source` (`-` for stdin) into a snapshot.
    pub fn load(&self, source: &Path) -> ApplicationResult<Tree> {
        let text = if source == Path::new(STDIN_SOURCE) {
            self.fs
                .read_stdin()
                .with_path_context("read input", source)?
        } else {
            if !self.fs.is_file(source) {
                return Err(ApplicationError::OperationFailed {
                    context: format!("read input: {}", source.display()),
                    source: "not a file".into(),
                });
            }
            self.fs
                .read_to_string(source)
                .with_path_context("read input", source)?
        };
        self.parse(&text, &source.display().to_string())
    }

    /// Parse JSON text into a snapshot; `origin` names the input in errors.
    pub fn parse(&self, text: &str, origin: &str) -> ApplicationResult<Tree> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|source| ApplicationError::InvalidJson {
                origin: origin.to_string(),
                source,
            })?;
        let tree = self.builder.build_from_value(&value)?;
        debug!("loaded {} entries from {}", tree.len(), origin);
        Ok(tree)
    }

    /// Apply `intents` in order.
    ///
    /// Rejections are collected and processing continues with the unchanged
    /// snapshot. A broken invariant aborts the whole batch.
    pub fn apply_all(&self, tree: &Tree, intents: &[EditIntent]) -> ApplicationResult<EditReport> {
        let mut current = tree.clone();
        let mut applied = 0;
        let mut rejected = Vec::new();

        for intent in intents {
            let edit = current
                .apply(intent)
                .map_err(|source| ApplicationError::EditFailed {
                    intent: intent.to_string(),
                    source,
                })?;
            current = match edit {
                Edit::Applied { tree, .. } => {
                    applied += 1;
                    tree
                }
                Edit::Rejected { tree, reason } => {
                    warn!("{}: {}", intent, reason);
                    rejected.push((intent.clone(), reason));
                    tree
                }
            };
        }
        info!(
            "applied {} of {} edits ({} rejected)",
            applied,
            intents.len(),
            rejected.len()
        );

        Ok(EditReport {
            before: tree.clone(),
            after: current,
            applied,
            rejected,
        })
    }
}
