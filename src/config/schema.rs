//! Configuration schema definitions for ragenv.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format. Every section has defaults, so an empty file
//! (or no file at all) yields a working configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::verify::ProbeMode;

/// Root configuration structure for `.ragenv/config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where to look for the application's environment.
    pub environment: EnvironmentSettings,

    /// Interpreter override (defaults to discovery on `PATH`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python: Option<PathBuf>,

    /// How dependencies are probed.
    pub probe: ProbeSettings,

    /// Dependencies the application needs, in check order.
    pub dependencies: Vec<DependencySpec>,

    /// Built front-end assets and the endpoints that serve them.
    pub frontend: FrontendSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: EnvironmentSettings::default(),
            python: None,
            probe: ProbeSettings::default(),
            dependencies: default_dependencies(),
            frontend: FrontendSettings::default(),
        }
    }
}

impl Settings {
    /// Module names of the configured dependencies, in order.
    pub fn dependency_names(&self) -> Vec<String> {
        self.dependencies.iter().map(|d| d.module.clone()).collect()
    }

    /// Display label for a module, falling back to the module name.
    pub fn label_for<'a>(&'a self, module: &'a str) -> &'a str {
        self.dependencies
            .iter()
            .find(|d| d.module == module)
            .map(|d| d.display_label())
            .unwrap_or(module)
    }
}

/// Environment search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentSettings {
    /// Variables that name the active environment's root when set.
    pub marker_vars: Vec<String>,

    /// Directory names tried in the working directory and its ancestors.
    pub dir_names: Vec<String>,

    /// How many ancestor levels above the working directory to search.
    pub max_depth: usize,

    /// Conventional location relative to the home directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_path: Option<PathBuf>,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            marker_vars: vec!["VIRTUAL_ENV".to_string()],
            dir_names: vec![
                "rag_env".to_string(),
                ".venv".to_string(),
                "venv".to_string(),
            ],
            max_depth: 5,
            home_path: Some(PathBuf::from(".lawfirm-rag").join("rag_env")),
        }
    }
}

/// Dependency probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    /// Probe strategy.
    pub mode: ProbeMode,

    /// Per-dependency timeout in seconds (0 = no timeout).
    pub timeout_secs: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            mode: ProbeMode::Import,
            timeout_secs: 120,
        }
    }
}

impl ProbeSettings {
    /// The timeout as a duration, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// A dependency to verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencySpec {
    /// Importable module name, e.g. `sentence_transformers`.
    pub module: String,

    /// Human-readable label for progress output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DependencySpec {
    pub fn new(module: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            label: Some(label.into()),
        }
    }

    /// The label if set, otherwise the module name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.module)
    }
}

fn default_dependencies() -> Vec<DependencySpec> {
    vec![
        DependencySpec::new("torch", "PyTorch (Deep Learning)"),
        DependencySpec::new(
            "sentence_transformers",
            "Sentence Transformers (Embeddings)",
        ),
        DependencySpec::new("chromadb", "ChromaDB (Vector Database)"),
    ]
}

/// Front-end asset settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontendSettings {
    /// Build output directory, relative to the project root.
    pub dist_dir: PathBuf,

    /// Files that must exist under `dist_dir`.
    pub assets: Vec<PathBuf>,

    /// Host the server listens on.
    pub host: String,

    /// Port the server listens on.
    pub port: u16,

    /// Paths the server exposes.
    pub endpoints: Vec<String>,
}

impl Default for FrontendSettings {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("frontend").join("dist"),
            assets: vec![
                PathBuf::from("index.html"),
                PathBuf::from("assets/styles.css"),
                PathBuf::from("assets/app.js"),
            ],
            host: "127.0.0.1".to_string(),
            port: 8000,
            endpoints: vec![
                "/health".to_string(),
                "/app".to_string(),
                "/assets/styles.css".to_string(),
                "/assets/app.js".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_yields_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings.environment, EnvironmentSettings::default());
        assert_eq!(settings.probe.mode, ProbeMode::Import);
        assert_eq!(settings.probe.timeout_secs, 120);
        assert_eq!(settings.dependencies.len(), 3);
        assert_eq!(settings.frontend.port, 8000);
        assert!(settings.python.is_none());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let yaml = r#"
environment:
  max_depth: 2
probe:
  mode: static
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.environment.max_depth, 2);
        assert_eq!(settings.environment.marker_vars, vec!["VIRTUAL_ENV"]);
        assert_eq!(settings.probe.mode, ProbeMode::Static);
        assert_eq!(settings.probe.timeout_secs, 120);
    }

    #[test]
    fn unknown_section_field_is_rejected() {
        let yaml = r#"
probe:
  timeout: 5
"#;
        assert!(serde_yaml::from_str::<Settings>(yaml).is_err());
    }

    #[test]
    fn dependency_label_falls_back_to_module() {
        let yaml = r#"
dependencies:
  - module: numpy
  - module: torch
    label: PyTorch
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.dependency_names(), vec!["numpy", "torch"]);
        assert_eq!(settings.label_for("numpy"), "numpy");
        assert_eq!(settings.label_for("torch"), "PyTorch");
        assert_eq!(settings.label_for("faiss"), "faiss");
    }

    #[test]
    fn zero_timeout_disables_it() {
        let probe = ProbeSettings {
            mode: ProbeMode::Import,
            timeout_secs: 0,
        };
        assert!(probe.timeout().is_none());
        assert_eq!(
            ProbeSettings::default().timeout(),
            Some(Duration::from_secs(120))
        );
    }

    #[test]
    fn default_home_path_is_relative() {
        let env = EnvironmentSettings::default();
        assert!(env.home_path.unwrap().is_relative());
    }
}
