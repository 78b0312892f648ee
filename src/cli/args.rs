//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::DisplayStyle;
use crate::domain::EditIntent;

/// Persistent JSON-shaped trees: structural edits that share every untouched subtree
#[derive(Parser, Debug)]
#[command(name = "snaptree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .snaptree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a JSON file and print the tree
    Show {
        /// JSON file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output style (tree|indent)
        #[arg(short, long)]
        style: Option<DisplayStyle>,
        /// Hide leaf content
        #[arg(long)]
        no_content: bool,
    },

    /// List the slash paths of all entries
    Paths {
        /// JSON file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only leaves
        #[arg(short, long)]
        leaves: bool,
    },

    /// Apply edits in order and print the resulting tree
    ///
    /// Edits: node:PATH/NAME, leaf:PATH/NAME=CONTENT, root:NAME, rm:PATH
    Edit {
        /// JSON file ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Edits, applied left to right
        #[arg(required = true, num_args = 1..)]
        edits: Vec<EditIntent>,
        /// Print the changes and the number of shared subtrees
        #[arg(long)]
        diff: bool,
        /// Output style (tree|indent)
        #[arg(short, long)]
        style: Option<DisplayStyle>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },
}
