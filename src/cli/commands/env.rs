//! Env command implementation.
//!
//! The `ragenv env` command prints a debug report of where the RAG
//! environment was looked for, what was found, and what it contains.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::EnvArgs;
use crate::config::Settings;
use crate::environment::{
    package_directory, CandidateSource, EnvironmentCandidate, EnvironmentLocator, Platform,
    PythonVersion, SearchPath,
};
use crate::error::{RagEnvError, Result};
use crate::ui::{StatusKind, UserInterface};
use crate::verify::{DependencyCheckResult, StaticProbe, Verifier};

use super::check::{project_locator, select_interpreter};
use super::dispatcher::{Command, CommandResult};
use super::display;

/// Everything `ragenv env` reports.
#[derive(Debug, Serialize)]
pub struct EnvReport {
    pub platform: Platform,
    pub interpreter: Option<PathBuf>,
    pub python_version: Option<PythonVersion>,
    /// Each configured marker variable and its value, if set.
    pub markers: BTreeMap<String, Option<PathBuf>>,
    pub active: bool,
    pub candidates: Vec<EnvironmentCandidate>,
    pub environment: Option<EnvironmentCandidate>,
    pub package_dir: Option<PathBuf>,
    pub package_dir_exists: bool,
    /// Static presence of each configured dependency in the package directory.
    pub dependencies: Vec<DependencyCheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sys_path: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_dir_on_sys_path: Option<bool>,
}

/// The env command implementation.
pub struct EnvCommand {
    project_root: PathBuf,
    settings: Settings,
    args: EnvArgs,
    locator: Option<EnvironmentLocator>,
}

impl EnvCommand {
    /// Create a new env command.
    pub fn new(project_root: &Path, settings: Settings, args: EnvArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            settings,
            args,
            locator: None,
        }
    }

    /// Use `locator` instead of one built from the process environment.
    pub fn with_locator(mut self, locator: EnvironmentLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    fn python_override(&self) -> Option<PathBuf> {
        self.args
            .python
            .clone()
            .or_else(|| self.settings.python.clone())
    }

    /// Gather the report without printing anything.
    pub fn report(&self) -> Result<EnvReport> {
        let locator = match &self.locator {
            Some(locator) => locator.clone(),
            None => project_locator(&self.project_root, &self.settings, self.python_override()),
        };
        let platform = locator.platform();

        let markers = self
            .settings
            .environment
            .marker_vars
            .iter()
            .map(|var| {
                let value = locator
                    .markers()
                    .iter()
                    .find(|(name, _)| name == var)
                    .map(|(_, path)| path.clone());
                (var.clone(), value)
            })
            .collect();

        let environment = locator.locate();
        let interpreter =
            match select_interpreter(self.python_override(), environment.as_ref(), platform) {
                Ok(i) => Some(i),
                Err(e) => {
                    tracing::debug!("No interpreter: {}", e);
                    None
                }
            };
        let python_version = interpreter.as_ref().and_then(|i| i.query_version().ok());

        let package_dir = environment
            .as_ref()
            .and_then(|env| package_directory(env, platform, python_version));
        let package_dir_exists = package_dir.as_deref().is_some_and(Path::is_dir);

        let names = self.settings.dependency_names();
        let dependencies = match &package_dir {
            Some(dir) if !names.is_empty() => {
                let probe = StaticProbe::new(dir);
                Verifier::new(&probe).verify(&names, |_| {})?.results
            }
            _ => Vec::new(),
        };

        let sys_path = match (&interpreter, self.args.sys_path) {
            (Some(i), true) => Some(i.sys_path(&SearchPath::inherit())?),
            (None, true) => {
                return Err(RagEnvError::InterpreterNotFound {
                    tried: "python3, python".to_string(),
                })
            }
            _ => None,
        };
        let package_dir_on_sys_path = match (&sys_path, &package_dir) {
            (Some(entries), Some(dir)) => Some(entries.iter().any(|p| p == dir)),
            _ => None,
        };

        Ok(EnvReport {
            platform,
            interpreter: interpreter.map(|i| i.path),
            python_version,
            markers,
            active: locator.is_active(),
            candidates: locator.candidates(),
            environment,
            package_dir,
            package_dir_exists,
            dependencies,
            sys_path,
            package_dir_on_sys_path,
        })
    }

    fn render(&self, report: &EnvReport, ui: &mut dyn UserInterface) {
        ui.show_header("RAG Environment Debug");
        ui.show_field(
            "Platform",
            match report.platform {
                Platform::Posix => "posix",
                Platform::Windows => "windows",
            },
        );
        ui.show_field(
            "Python executable",
            &display::path_or_none(report.interpreter.as_deref()),
        );
        ui.show_field(
            "Python version",
            &report
                .python_version
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        );
        for (var, value) in &report.markers {
            ui.show_field(var, &display::path_or_none(value.as_deref()));
        }
        ui.show_field("In RAG environment", display::yes_no(report.active));

        ui.show_header("Search Locations");
        for candidate in &report.candidates {
            ui.message(&format!(
                "{} {} ({})",
                StatusKind::from(candidate.exists).bracketed(),
                candidate.path.display(),
                source_label(&candidate.source)
            ));
        }

        ui.show_header("RAG Environment");
        let Some(env) = &report.environment else {
            ui.error("No RAG environment found");
            ui.show_hint("Create one with: python -m venv rag_env");
            return;
        };
        ui.show_field("RAG environment found", &env.path.display().to_string());
        ui.show_field(
            "Site packages path",
            &display::path_or_none(report.package_dir.as_deref()),
        );
        ui.show_field(
            "Site packages exists",
            display::yes_no(report.package_dir_exists),
        );
        for result in &report.dependencies {
            ui.show_field(
                &format!("{} installed", result.name),
                display::yes_no(result.found()),
            );
        }

        if let Some(entries) = &report.sys_path {
            ui.show_header("Current sys.path");
            for (i, entry) in entries.iter().enumerate() {
                ui.message(&format!("{}: {}", i, entry.display()));
            }
            match report.package_dir_on_sys_path {
                Some(true) => ui.success("Site packages already in sys.path"),
                Some(false) => {
                    ui.warning("Site packages not in sys.path");
                    ui.show_hint("'ragenv check' adds it to PYTHONPATH for the interpreter it runs");
                }
                None => {}
            }
        }
    }
}

fn source_label(source: &CandidateSource) -> String {
    match source {
        CandidateSource::Active => "active".to_string(),
        CandidateSource::Ancestor { depth: 0 } => "working directory".to_string(),
        CandidateSource::Ancestor { depth } => format!("{} level(s) up", depth),
        CandidateSource::Home => "home".to_string(),
    }
}

impl Command for EnvCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self.report()?;

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&report).map_err(|e| RagEnvError::Other(e.into()))?;
            ui.message(&json);
        } else {
            self.render(&report, ui);
        }

        Ok(CommandResult::from_check(report.environment.is_some()))
    }
}
