//! Check command implementation.
//!
//! The `ragenv check` command verifies that the RAG dependencies are
//! available, showing one spinner per dependency.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::cli::args::CheckArgs;
use crate::config::Settings;
use crate::environment::{
    package_directory, EnvironmentCandidate, EnvironmentLocator, Interpreter, Platform,
    SearchPath,
};
use crate::error::{RagEnvError, Result};
use crate::ui::{format_duration, SpinnerHandle, UserInterface};
use crate::verify::probe::serialize_millis;
use crate::verify::{
    DependencyProbe, ImportMode, ImportProbe, ProbeMode, ProgressEvent, StaticProbe,
    VerificationReport, Verifier,
};

use super::dispatcher::{Command, CommandResult, EXIT_ERROR};
use super::display;

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    settings: Settings,
    args: CheckArgs,
    locator: Option<EnvironmentLocator>,
}

/// JSON shape of `check --json`.
#[derive(Serialize)]
struct CheckOutput<'a> {
    mode: ProbeMode,
    environment: Option<&'a Path>,
    interpreter: Option<&'a Path>,
    all_found: bool,
    #[serde(rename = "total_elapsed_ms", serialize_with = "serialize_millis")]
    total_elapsed: Duration,
    #[serde(flatten)]
    report: &'a VerificationReport,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, settings: Settings, args: CheckArgs) -> Self {
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

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }

    /// The probe strategy in effect.
    pub fn mode(&self) -> ProbeMode {
        self.args.mode.unwrap_or(self.settings.probe.mode)
    }

    /// The per-dependency timeout in effect. `--timeout 0` disables it.
    pub fn timeout(&self) -> Option<Duration> {
        match self.args.timeout {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => self.settings.probe.timeout(),
        }
    }

    /// Modules to check: the arguments, else the configured dependencies.
    pub fn modules(&self) -> Vec<String> {
        if self.args.modules.is_empty() {
            self.settings.dependency_names()
        } else {
            self.args.modules.clone()
        }
    }

    fn python_override(&self) -> Option<PathBuf> {
        self.args
            .python
            .clone()
            .or_else(|| self.settings.python.clone())
    }

    fn locator(&self) -> EnvironmentLocator {
        match &self.locator {
            Some(locator) => locator.clone(),
            None => project_locator(&self.project_root, &self.settings, self.python_override()),
        }
    }

    fn static_probe(
        &self,
        environment: Option<&EnvironmentCandidate>,
        locator: &EnvironmentLocator,
    ) -> Result<StaticProbe> {
        let platform = locator.platform();
        let env = environment.ok_or_else(|| RagEnvError::EnvironmentNotFound {
            searched: locator.candidates().len(),
        })?;

        // Only consult an interpreter when the environment declares no version.
        let fallback = match env.version {
            Some(_) => None,
            None => select_interpreter(self.python_override(), Some(env), platform)
                .ok()
                .and_then(|i| i.query_version().ok()),
        };

        let dir = package_directory(env, platform, fallback).ok_or_else(|| {
            RagEnvError::Other(anyhow::anyhow!(
                "cannot tell which Python version {} was built for",
                env.path.display()
            ))
        })?;
        tracing::debug!("Static probe over {}", dir.display());
        Ok(StaticProbe::new(dir))
    }

    fn import_probe(
        &self,
        environment: Option<&EnvironmentCandidate>,
        locator: &EnvironmentLocator,
        mode: ImportMode,
    ) -> Result<ImportProbe> {
        let platform = locator.platform();
        let interpreter = select_interpreter(self.python_override(), environment, platform)?;

        let mut search = SearchPath::inherit();
        if let Some(env) = environment {
            if !env.active && !interpreter.path.starts_with(&env.path) {
                let fallback = interpreter.query_version().ok();
                if let Some(dir) = package_directory(env, platform, fallback) {
                    tracing::debug!("Adding {} to the search path", dir.display());
                    search.push(dir);
                }
            }
        }

        Ok(ImportProbe::new(interpreter)
            .with_mode(mode)
            .with_search_path(search)
            .with_timeout(self.timeout())
            .with_cwd(&self.project_root))
    }

    fn verify(
        &self,
        probe: &dyn DependencyProbe,
        modules: &[String],
        found_verb: &str,
        ui: &mut dyn UserInterface,
    ) -> Result<VerificationReport> {
        let verifier = Verifier::new(probe);
        if self.args.json {
            return verifier.verify(modules, |_| {});
        }

        let settings = &self.settings;
        let details = ui.output_mode().shows_details();
        let mut spinner: Option<Box<dyn SpinnerHandle>> = None;

        verifier.verify(modules, |event| match event {
            ProgressEvent::Started { name, .. } => {
                let label = settings.label_for(name);
                spinner = Some(ui.start_spinner(&format!("Checking {}...", label)));
            }
            ProgressEvent::Finished { result, .. } => {
                let label = settings.label_for(&result.name);
                if let Some(mut s) = spinner.take() {
                    display::finish_dependency(s.as_mut(), label, result, found_verb);
                }
                if details {
                    display::show_dependency_details(ui, result);
                }
            }
        })
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let locator = self.locator();
        let environment = locator.locate();
        let mode = self.mode();
        let modules = self.modules();

        if !self.args.json {
            match &environment {
                Some(env) => {
                    if ui.output_mode().shows_details() {
                        ui.show_field("Environment", &env.path.display().to_string());
                        ui.show_field("Active", display::yes_no(env.active));
                    }
                }
                None if mode != ProbeMode::Static => {
                    ui.warning("No RAG environment found; checking the default interpreter");
                }
                None => {}
            }
        }

        let (report, interpreter) = match mode {
            ProbeMode::Static => {
                let probe = match self.static_probe(environment.as_ref(), &locator) {
                    Ok(p) => p,
                    Err(e) if !self.args.json => {
                        ui.error(&e.to_string());
                        ui.show_hint("Run 'ragenv env' to see where the environment was looked for");
                        return Ok(CommandResult::failure(EXIT_ERROR));
                    }
                    Err(e) => return Err(e),
                };
                (self.verify(&probe, &modules, "found", ui)?, None)
            }
            ProbeMode::Import | ProbeMode::Locate => {
                let import_mode = if mode == ProbeMode::Import {
                    ImportMode::Import
                } else {
                    ImportMode::Locate
                };
                let probe = self.import_probe(environment.as_ref(), &locator, import_mode)?;
                let verb = if mode == ProbeMode::Import {
                    "loaded"
                } else {
                    "found"
                };
                let report = self.verify(&probe, &modules, verb, ui)?;
                (report, Some(probe.interpreter().path.clone()))
            }
        };

        if self.args.json {
            let output = CheckOutput {
                mode,
                environment: environment.as_ref().map(|e| e.path.as_path()),
                interpreter: interpreter.as_deref(),
                all_found: report.all_found(),
                total_elapsed: report.total_elapsed(),
                report: &report,
            };
            let json =
                serde_json::to_string_pretty(&output).map_err(|e| RagEnvError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::from_check(report.all_found()));
        }

        if ui.output_mode().shows_details() {
            ui.show_field("Total time", &format_duration(report.total_elapsed()));
        }

        if report.all_found() {
            ui.success("All dependencies loaded successfully!");
        } else {
            ui.error(&format!("Missing dependencies: {}", report.missing.join(", ")));
            if environment.is_none() {
                ui.show_hint("Create the RAG environment (rag_env) and install the requirements into it");
            } else {
                ui.show_hint("Install the missing packages into the RAG environment");
            }
        }

        Ok(CommandResult::from_check(report.all_found()))
    }
}

/// A locator rooted at the project, using the real process environment.
///
/// The interpreter the process would run serves as the sentinel for an
/// activated environment.
pub(super) fn project_locator(
    project_root: &Path,
    settings: &Settings,
    python_override: Option<PathBuf>,
) -> EnvironmentLocator {
    let sentinel = Interpreter::discover(python_override.as_deref())
        .ok()
        .map(|i| i.path);
    EnvironmentLocator::with_env(
        &settings.environment,
        project_root.to_path_buf(),
        dirs::home_dir(),
        |key: &str| std::env::var(key),
    )
    .with_interpreter(sentinel)
}

/// Pick the interpreter to probe with.
///
/// An explicit override wins, then the environment's own interpreter, then
/// whatever is on `PATH`.
pub(super) fn select_interpreter(
    python_override: Option<PathBuf>,
    environment: Option<&EnvironmentCandidate>,
    platform: Platform,
) -> Result<Interpreter> {
    if let Some(path) = python_override {
        return Ok(Interpreter::new(path));
    }
    if let Some(own) = environment.and_then(|env| Interpreter::for_environment(env, platform)) {
        return Ok(own);
    }
    Interpreter::discover(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentSettings;
    use crate::ui::{MockUI, OutputMode, SpinnerStatus};
    use std::fs;
    use tempfile::TempDir;

    /// A project with `rag_env` (Python 3.11) holding torch and chromadb.
    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let env = temp.path().join("rag_env");
        let site = env.join("lib/python3.11/site-packages");
        fs::create_dir_all(site.join("torch")).unwrap();
        fs::write(site.join("torch/__init__.py"), "").unwrap();
        fs::write(site.join("chromadb.py"), "").unwrap();
        fs::write(env.join("pyvenv.cfg"), "home = /usr/bin\nversion = 3.11.4\n").unwrap();
        temp
    }

    fn locator(root: &Path) -> EnvironmentLocator {
        EnvironmentLocator::with_env(
            &EnvironmentSettings::default(),
            root.to_path_buf(),
            None,
            |_: &str| Err(std::env::VarError::NotPresent),
        )
        .with_platform(Platform::Posix)
    }

    fn static_args(modules: &[&str]) -> CheckArgs {
        CheckArgs {
            modules: modules.iter().map(|m| m.to_string()).collect(),
            mode: Some(ProbeMode::Static),
            ..Default::default()
        }
    }

    #[test]
    fn timeout_resolution() {
        let root = Path::new("/srv/app");
        let cmd = CheckCommand::new(root, Settings::default(), CheckArgs::default());
        assert_eq!(cmd.timeout(), Some(Duration::from_secs(120)));

        let args = CheckArgs {
            timeout: Some(0),
            ..Default::default()
        };
        assert_eq!(CheckCommand::new(root, Settings::default(), args).timeout(), None);

        let args = CheckArgs {
            timeout: Some(5),
            ..Default::default()
        };
        assert_eq!(
            CheckCommand::new(root, Settings::default(), args).timeout(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn modules_default_to_configured_dependencies() {
        let cmd = CheckCommand::new(Path::new("/"), Settings::default(), CheckArgs::default());
        assert_eq!(cmd.modules(), vec!["torch", "sentence_transformers", "chromadb"]);
        assert_eq!(cmd.mode(), ProbeMode::Import);
    }

    #[test]
    fn static_check_reports_each_dependency() {
        let temp = project();
        let cmd = CheckCommand::new(temp.path(), Settings::default(), static_args(&[]))
            .with_locator(locator(temp.path()));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(
            ui.spinners(),
            &[
                "Checking PyTorch (Deep Learning)...",
                "Checking Sentence Transformers (Embeddings)...",
                "Checking ChromaDB (Vector Database)...",
            ]
        );
        let finishes = ui.spinner_finishes();
        assert_eq!(finishes[0].0, SpinnerStatus::Success);
        assert!(finishes[0].1.starts_with("PyTorch (Deep Learning) found ("));
        assert_eq!(
            finishes[1],
            (
                SpinnerStatus::Error,
                "Sentence Transformers (Embeddings) not found".to_string()
            )
        );
        assert!(ui.has_error("Missing dependencies: sentence_transformers"));
        assert!(!ui.hints().is_empty());
    }

    #[test]
    fn static_check_all_found() {
        let temp = project();
        let cmd = CheckCommand::new(temp.path(), Settings::default(), static_args(&["torch", "chromadb"]))
            .with_locator(locator(temp.path()));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_success("All dependencies loaded successfully!"));
        assert!(ui.errors().is_empty());
    }

    #[test]
    fn static_check_without_environment_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cmd = CheckCommand::new(temp.path(), Settings::default(), static_args(&["torch"]))
            .with_locator(locator(temp.path()));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, EXIT_ERROR);
        assert!(ui.has_error("No RAG environment found"));
        assert!(ui.spinners().is_empty());
    }

    #[test]
    fn invalid_module_name_is_an_error() {
        let temp = project();
        let cmd = CheckCommand::new(temp.path(), Settings::default(), static_args(&["torch>=2"]))
            .with_locator(locator(temp.path()));
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, RagEnvError::InvalidDependencyName { .. }));
        assert!(ui.spinners().is_empty());
    }

    #[test]
    fn json_output_skips_spinners() {
        let temp = project();
        let args = CheckArgs {
            json: true,
            ..static_args(&["torch", "faiss"])
        };
        let cmd = CheckCommand::new(temp.path(), Settings::default(), args)
            .with_locator(locator(temp.path()));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.spinners().is_empty());
        let value: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(value["mode"], "static");
        assert_eq!(value["all_found"], false);
        assert_eq!(value["missing"][0], "faiss");
        assert_eq!(value["results"][0]["status"], "found");
        let total = value["total_elapsed_ms"].as_u64().unwrap();
        let sum: u64 = value["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["elapsed_ms"].as_u64().unwrap())
            .sum();
        assert!(total >= sum);
    }

    #[test]
    fn verbose_shows_environment_and_details() {
        let temp = project();
        let cmd = CheckCommand::new(temp.path(), Settings::default(), static_args(&["torch"]))
            .with_locator(locator(temp.path()));
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        cmd.execute(&mut ui).unwrap();

        assert_eq!(ui.field("Active"), Some("no"));
        assert!(ui.field("Environment").unwrap().ends_with("rag_env"));
        assert!(ui.field("Location").unwrap().contains("site-packages"));
        assert!(ui.field("Total time").is_some());
    }

    #[cfg(unix)]
    mod import_mode {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        // Arguments arrive as: -c SCRIPT <module> <mode>
        const FAKE_PYTHON: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "Python 3.11.4"
  exit 0
fi
case "$3" in
  torch) echo "{\"version\": \"2.1.0\", \"location\": \"$PYTHONPATH\"}" ;;
  chromadb) echo "ImportError: libsqlite3.so.0" >&2; exit 4 ;;
  *) exit 3 ;;
esac
"#;

        fn fake_python(dir: &Path) -> PathBuf {
            let path = dir.join("python3");
            fs::write(&path, FAKE_PYTHON).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn import_check_pushes_package_directory() {
            let temp = project();
            let bin = TempDir::new().unwrap();
            let args = CheckArgs {
                modules: vec!["torch".into(), "chromadb".into(), "faiss".into()],
                python: Some(fake_python(bin.path())),
                ..Default::default()
            };
            let cmd = CheckCommand::new(temp.path(), Settings::default(), args)
                .with_locator(locator(temp.path()));
            let mut ui = MockUI::with_mode(OutputMode::Verbose);

            let result = cmd.execute(&mut ui).unwrap();

            assert_eq!(result.exit_code, 1);
            assert!(ui
                .field("Location")
                .unwrap()
                .contains("rag_env/lib/python3.11/site-packages"));

            let finishes = ui.spinner_finishes();
            assert!(finishes[0].1.starts_with("PyTorch (Deep Learning) loaded ("));
            assert_eq!(
                finishes[1],
                (
                    SpinnerStatus::Warning,
                    "ChromaDB (Vector Database) is broken: ImportError: libsqlite3.so.0"
                        .to_string()
                )
            );
            assert_eq!(finishes[2], (SpinnerStatus::Error, "faiss not found".to_string()));
            assert!(ui.has_error("Missing dependencies: chromadb, faiss"));
        }

        #[test]
        fn import_check_without_environment_warns() {
            let temp = TempDir::new().unwrap();
            let bin = TempDir::new().unwrap();
            let args = CheckArgs {
                modules: vec!["torch".into()],
                python: Some(fake_python(bin.path())),
                ..Default::default()
            };
            let cmd = CheckCommand::new(temp.path(), Settings::default(), args)
                .with_locator(locator(temp.path()));
            let mut ui = MockUI::new();

            let result = cmd.execute(&mut ui).unwrap();

            assert!(result.success);
            assert!(ui.has_warning("No RAG environment found"));
        }
    }
}
