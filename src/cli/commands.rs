//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, DisplayStyle, Settings};
use crate::domain::{EditIntent, Tree};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::TreeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let local_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| CliError::io("current directory", e))?,
    };
    let settings = Settings::load(Some(&local_dir))?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Show {
            file,
            style,
            no_content,
        }) => _show(&container, file, *style, *no_content),
        Some(Commands::Paths { file, leaves }) => _paths(&container, file, *leaves),
        Some(Commands::Edit {
            file,
            edits,
            diff,
            style,
        }) => _edit(&container, file, edits, *diff, *style),
        Some(Commands::Config { command }) => _config(&container, command, &local_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Render a snapshot according to settings, with optional overrides.
pub fn render(
    tree: &Tree,
    settings: &Settings,
    style: Option<DisplayStyle>,
    show_content: bool,
) -> String {
    match style.unwrap_or(settings.display.style) {
        DisplayStyle::Tree => tree
            .to_term_tree(show_content && settings.display.show_content)
            .to_string(),
        DisplayStyle::Indent => tree.to_string(),
    }
}

#[instrument(skip(container))]
fn _show(
    container: &ServiceContainer,
    file: &Path,
    style: Option<DisplayStyle>,
    no_content: bool,
) -> CliResult<()> {
    let tree = container.snapshots.load(file)?;
    output::info(render(&tree, &container.settings, style, !no_content).trim_end());
    Ok(())
}

#[instrument(skip(container))]
fn _paths(container: &ServiceContainer, file: &Path, leaves: bool) -> CliResult<()> {
    let tree = container.snapshots.load(file)?;
    let paths = if leaves {
        tree.leaf_paths()
    } else {
        tree.iter()
            .map(|(path, _)| path)
            .filter(|path| !path.is_root())
            .collect()
    };
    for path in paths {
        output::info(&tree.path_string(&path));
    }
    Ok(())
}

#[instrument(skip(container, edits))]
fn _edit(
    container: &ServiceContainer,
    file: &Path,
    edits: &[EditIntent],
    diff: bool,
    style: Option<DisplayStyle>,
) -> CliResult<()> {
    let tree = container.snapshots.load(file)?;
    let report = container.snapshots.apply_all(&tree, edits)?;

    for (intent, reason) in &report.rejected {
        output::warning(&format!("{} rejected: {}", intent, reason));
    }
    output::info(render(&report.after, &container.settings, style, true).trim_end());

    if diff {
        let changes = report.diff();
        output::header("changes");
        for change in &changes.changes {
            output::change(change.kind, &report.after.path_string(&change.path));
        }
        output::detail(&format!("{} subtrees shared with the input", changes.shared));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    local_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(container.settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".to_string());
            output::action("global", &global);
            output::action("local", &local_config_path(local_dir).display());
        }
        ConfigCommands::Init { global } => {
            let path: PathBuf = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::InvalidArgs("no config directory on this platform".to_string())
                })?
            } else {
                local_config_path(local_dir)
            };
            if path.exists() {
                return Err(CliError::InvalidArgs(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CliError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
            output::action("created", &path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TreeBuilder;
    use serde_json::json;

    fn sample() -> Tree {
        TreeBuilder::default()
            .build_from_value(&json!({"a": {"b": 1}, "d": 2}))
            .unwrap()
    }

    #[test]
    fn given_indent_style_when_rendering_then_uses_debug_format() {
        let rendered = render(
            &sample(),
            &Settings::default(),
            Some(DisplayStyle::Indent),
            true,
        );
        assert_eq!(rendered, "root/\n  a/\n    b:1\n  d:2");
    }

    #[test]
    fn given_tree_style_without_content_when_rendering_then_hides_values() {
        let rendered = render(&sample(), &Settings::default(), None, false);
        assert!(rendered.contains("a/"));
        assert!(!rendered.contains(": 1"));
    }
}
