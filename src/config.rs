//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/snaptree/snaptree.toml`
//! 3. Local config: `<dir>/.snaptree.toml` (`-C` directory or cwd)
//! 4. Environment variables: `SNAPTREE_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::DEFAULT_ROOT_NAME;

/// How `show` and `edit` print a snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    /// Box-drawing tree via termtree
    #[default]
    Tree,
    /// Two spaces per level, `name:content` leaves
    Indent,
}

impl fmt::Display for DisplayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayStyle::Tree => write!(f, "tree"),
            DisplayStyle::Indent => write!(f, "indent"),
        }
    }
}

impl FromStr for DisplayStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" => Ok(DisplayStyle::Tree),
            "indent" => Ok(DisplayStyle::Indent),
            other => Err(format!("unknown display style '{}' (tree|indent)", other)),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub style: DisplayStyle,
    /// Print leaf content next to leaf names
    pub show_content: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            style: DisplayStyle::Tree,
            show_content: true,
        }
    }
}

/// Raw display config for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplayConfig {
    pub style: Option<DisplayStyle>,
    pub show_content: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_name: Option<String>,
    pub display: RawDisplayConfig,
}

/// Unified configuration for snaptree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Name of the root node created on ingestion
    pub root_name: String,
    /// Output settings
    pub display: DisplayConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            display: DisplayConfig::default(),
        }
    }
}

/// Get the XDG config directory for snaptree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "snaptree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("snaptree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".snaptree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root_name: overlay
                .root_name
                .clone()
                .unwrap_or_else(|| self.root_name.clone()),
            display: DisplayConfig {
                style: overlay.display.style.unwrap_or(self.display.style),
                show_content: overlay
                    .display
                    .show_content
                    .unwrap_or(self.display.show_content),
            },
        }
    }

    /// Expand `~` and `$VAR` in the root name, e.g. `root_name = "$USER"`.
    fn expand_vars(&mut self) {
        if let Ok(expanded) = shellexpand::full(&self.root_name) {
            self.root_name = expanded.into_owned();
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.snaptree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), local_dir)
    }

    /// Like [`Settings::load`] with an explicit global config file.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config: {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_vars();

        if current.root_name.is_empty() {
            return Err(ApplicationError::Config {
                message: "root_name must not be empty".to_string(),
            });
        }
        Ok(current)
    }

    /// Apply SNAPTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("SNAPTREE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("root_name") {
            settings.root_name = val;
        }
        if let Ok(val) = config.get_string("display.style") {
            settings.display.style = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_bool("display.show_content") {
            settings.display.show_content = val;
        }

        Ok(settings)
    }

    /// Serialize settings to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }

    /// Commented config template for `config init`.
    pub fn template() -> String {
        r#"# snaptree configuration
#
# Global: $XDG_CONFIG_HOME/snaptree/snaptree.toml
# Local:  .snaptree.toml in the working directory (or -C <dir>)
# Env:    SNAPTREE_ROOT_NAME, SNAPTREE_DISPLAY__STYLE, SNAPTREE_DISPLAY__SHOW_CONTENT

# Name of the root node created when ingesting JSON
# root_name = "root"

[display]
# "tree" (box drawing) or "indent" (two spaces per level)
# style = "tree"

# Print leaf content next to leaf names
# show_content = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, None).unwrap();
        assert_eq!(settings.display, DisplayConfig::default());
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings::default();
        let overlay = RawSettings {
            root_name: Some("top".into()),
            display: RawDisplayConfig {
                style: Some(DisplayStyle::Indent),
                show_content: None,
            },
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.root_name, "top");
        assert_eq!(merged.display.style, DisplayStyle::Indent);
        assert!(merged.display.show_content);
    }

    #[test]
    fn given_style_names_when_parsing_then_case_insensitive() {
        assert_eq!("Indent".parse::<DisplayStyle>(), Ok(DisplayStyle::Indent));
        assert_eq!(" tree ".parse::<DisplayStyle>(), Ok(DisplayStyle::Tree));
        assert!("boxes".parse::<DisplayStyle>().is_err());
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.root_name.is_none());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
