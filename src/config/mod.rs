//! Configuration loading, parsing, and validation for ragenv.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use ragenv::config::{load_settings, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let config_dir = temp.path().join(".ragenv");
//! fs::create_dir_all(&config_dir).unwrap();
//! fs::write(config_dir.join("config.yml"), "environment:\n  max_depth: 2\n").unwrap();
//!
//! let settings = load_settings(temp.path(), None).unwrap();
//! validate(&settings).unwrap();
//! assert_eq!(settings.environment.max_depth, 2);
//! ```
//!
//! # Configuration File Locations
//!
//! ragenv merges configuration in this order:
//! 1. Built-in defaults
//! 2. User global config (`~/.ragenv/config.yml`)
//! 3. Project config (`.ragenv/config.yml`)
//!
//! `--config <FILE>` replaces steps 2 and 3. Command-line flags and
//! `RAGENV_*` variables are applied last by the CLI.

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{
    find_project_root, load_config_value, load_merged_settings, load_settings, ConfigPaths,
    CONFIG_DIR, CONFIG_FILE,
};
pub use merger::{deep_merge, merge_layers};
pub use schema::{DependencySpec, EnvironmentSettings, FrontendSettings, ProbeSettings, Settings};
pub use validator::{validate, validate_settings, ValidationError};
