//! Configuration file discovery and loading.
//!
//! Layers are read as raw YAML, merged with [`merge_layers`], and only then
//! deserialized into [`Settings`], so a project file can override a single
//! key of a section set in the user's global file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::merger::merge_layers;
use crate::config::schema::Settings;
use crate::error::{RagEnvError, Result};

/// Directory holding ragenv configuration, both in a project and in `$HOME`.
pub const CONFIG_DIR: &str = ".ragenv";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. User global config (`~/.ragenv/config.yml`)
/// 2. Project config (`.ragenv/config.yml`)
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config.
    pub user_global: Option<PathBuf>,

    /// Project config.
    pub project: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self::discover_with_home(project_root, dirs::home_dir().as_deref())
    }

    /// Discover config files with an explicit home directory.
    pub fn discover_with_home(project_root: &Path, home: Option<&Path>) -> Self {
        Self {
            user_global: home.and_then(existing_config),
            project: existing_config(project_root),
        }
    }

    /// All existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.user_global.iter().chain(self.project.iter()).collect()
    }
}

fn existing_config(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_DIR).join(CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Find the project root by walking up from `start`.
///
/// A `.ragenv` directory wins over a `.git` directory found at the same or
/// a higher level.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut git_root = None;

    for dir in start.ancestors() {
        if dir.join(CONFIG_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        if git_root.is_none() && dir.join(".git").exists() {
            git_root = Some(dir.to_path_buf());
        }
    }

    git_root
}

/// Load a config file as a raw YAML value (for merging).
///
/// An empty file loads as an empty mapping.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RagEnvError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RagEnvError::Io(e)
        }
    })?;

    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| RagEnvError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if value.is_null() {
        return Ok(serde_yaml::Value::Mapping(Default::default()));
    }
    Ok(value)
}

/// Deserialize merged layers into typed settings.
fn parse_settings(layers: &[serde_yaml::Value], source: &Path) -> Result<Settings> {
    serde_yaml::from_value(merge_layers(layers)).map_err(|e| RagEnvError::ConfigParseError {
        path: source.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge every discovered config file over the built-in defaults.
///
/// Having no config file at all is fine.
pub fn load_merged_settings(paths: &ConfigPaths) -> Result<Settings> {
    let existing = paths.all_existing();
    let Some(last) = existing.last() else {
        return Ok(Settings::default());
    };

    let layers = existing
        .iter()
        .map(|p| load_config_value(p))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Merged {} config file(s)", layers.len());
    parse_settings(&layers, last)
}

/// Load settings for a project.
///
/// An explicit `config_override` is loaded alone, without merging the
/// discovered files, and must exist.
pub fn load_settings(project_root: &Path, config_override: Option<&Path>) -> Result<Settings> {
    match config_override {
        Some(path) => {
            let value = load_config_value(path)?;
            parse_settings(&[value], path)
        }
        None => load_merged_settings(&ConfigPaths::discover(project_root)),
    }
}
