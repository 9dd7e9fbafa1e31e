//! Python interpreter discovery and queries.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{RagEnvError, Result};
use crate::process::{self, CommandOptions};

use super::candidate::EnvironmentCandidate;
use super::platform::{Platform, PythonVersion};
use super::search_path::{SearchPath, PYTHONPATH};

#[cfg(target_os = "windows")]
const PYTHON_CANDIDATES: &[&str] = &["python"];

#[cfg(not(target_os = "windows"))]
const PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Prints one `sys.path` entry per line.
const SYS_PATH_SNIPPET: &str = "import sys\nfor p in sys.path:\n    print(p)";

/// A Python interpreter on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpreter {
    /// Path to the interpreter binary.
    pub path: PathBuf,
}

impl Interpreter {
    /// Wrap an interpreter path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Find the interpreter this process would run.
    ///
    /// An explicit override wins; otherwise the first of `python3`, `python`
    /// found on `PATH`.
    pub fn discover(override_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = override_path {
            return Ok(Self::new(path));
        }

        for candidate in PYTHON_CANDIDATES {
            if let Ok(path) = which::which(candidate) {
                tracing::debug!("Using interpreter {}", path.display());
                return Ok(Self::new(path));
            }
        }

        Err(RagEnvError::InterpreterNotFound {
            tried: PYTHON_CANDIDATES.join(", "),
        })
    }

    /// The interpreter belonging to an environment, if it has one.
    pub fn for_environment(candidate: &EnvironmentCandidate, platform: Platform) -> Option<Self> {
        platform
            .interpreter_paths(&candidate.path)
            .into_iter()
            .find(|p| p.is_file())
            .map(Self::new)
    }

    /// Run `python --version` and parse the result.
    ///
    /// Old interpreters print the version on stderr, so both streams are
    /// searched.
    pub fn query_version(&self) -> Result<PythonVersion> {
        let output = process::run(&self.path, &["--version"], &CommandOptions::default())?;
        if !output.success() {
            return Err(RagEnvError::InterpreterFailed {
                interpreter: self.path.clone(),
                message: format!("--version exited with {:?}", output.exit_code),
            });
        }
        let text = format!("{}{}", output.stdout, output.stderr);
        text.parse()
    }

    /// List the interpreter's `sys.path` with `search_path` applied.
    pub fn sys_path(&self, search_path: &SearchPath) -> Result<Vec<PathBuf>> {
        let mut options = CommandOptions::default();
        if let Some(value) = search_path.to_env_value()? {
            options.env.insert(PYTHONPATH.to_string(), value);
        }

        let output = process::run(&self.path, &["-c", SYS_PATH_SNIPPET], &options)?;
        if !output.success() {
            return Err(RagEnvError::InterpreterFailed {
                interpreter: self.path.clone(),
                message: output.stderr.trim().to_string(),
            });
        }

        Ok(output
            .stdout
            .lines()
            .map(|l| PathBuf::from(l.trim_end()))
            .collect())
    }
}
