//! Installer settings loaded from `dotlink.toml` at the dotfiles root.
pub mod toml_loader;

use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// Name of the optional settings file at the dotfiles root.
pub const SETTINGS_FILE: &str = "dotlink.toml";

/// Tunables for a run. Every field has a default, so the file is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory names that discovery never descends into.
    pub skip_dirs: Vec<String>,
    /// Whether to remove a `~/.config` that only holds `mise/` before linking.
    pub repair_stray_config: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            skip_dirs: vec![".git".to_string()],
            repair_stray_config: true,
        }
    }
}

impl Settings {
    /// Load `dotlink.toml` from `root`, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not valid
    /// TOML, or contains unknown keys.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        toml_loader::load_config(&root.join(SETTINGS_FILE))
    }
}
