//! Environment candidates.
//!
//! A candidate is one location the locator considered. It is built fresh on
//! every invocation from whatever is on disk at that moment.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::platform::{Platform, PythonVersion};

/// Marker file written by `python -m venv` at the environment root.
pub const PYVENV_CFG: &str = "pyvenv.cfg";

/// Which step of the search produced a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateSource {
    /// The currently active environment.
    Active,
    /// A venv directory in the working directory (depth 0) or an ancestor.
    Ancestor { depth: usize },
    /// The conventional location under the home directory.
    Home,
}

/// A location that may hold the application's environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentCandidate {
    /// Environment root directory.
    pub path: PathBuf,
    /// Whether this is the environment the process is running in.
    pub active: bool,
    /// Whether the directory exists on disk.
    pub exists: bool,
    /// How the candidate was found.
    pub source: CandidateSource,
    /// Interpreter version the environment declares, if discoverable.
    pub version: Option<PythonVersion>,
}

impl EnvironmentCandidate {
    /// Inspect `path` on disk and build a candidate for it.
    pub fn inspect(path: PathBuf, source: CandidateSource, active: bool, platform: Platform) -> Self {
        let exists = path.is_dir();
        let version = if exists {
            declared_version(&path, platform)
        } else {
            None
        };
        Self {
            path,
            active,
            exists,
            source,
            version,
        }
    }

    /// Whether the directory looks like a virtual environment.
    pub fn is_valid(&self, platform: Platform) -> bool {
        self.exists && looks_like_environment(&self.path, platform)
    }
}

/// Whether `root` contains `pyvenv.cfg` or an interpreter binary.
pub fn looks_like_environment(root: &Path, platform: Platform) -> bool {
    root.join(PYVENV_CFG).is_file()
        || platform
            .interpreter_paths(root)
            .iter()
            .any(|p| p.is_file())
}

/// The version an environment declares about itself.
///
/// `pyvenv.cfg` is authoritative (`version = 3.11.4`, or `version_info` as
/// written by virtualenv). Without it, a single `lib/pythonX.Y` directory is
/// taken as the answer; several such directories are ambiguous.
pub fn declared_version(root: &Path, platform: Platform) -> Option<PythonVersion> {
    if let Ok(content) = fs::read_to_string(root.join(PYVENV_CFG)) {
        if let Some(version) = parse_pyvenv_version(&content) {
            return Some(version);
        }
    }

    if platform == Platform::Windows {
        return None;
    }

    let entries = fs::read_dir(platform.lib_dir(root)).ok()?;
    let mut found = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| PythonVersion::from_lib_dir_name(&e.file_name().to_string_lossy()));

    let first = found.next()?;
    match found.next() {
        None => Some(first),
        Some(_) => None,
    }
}

/// Extract the interpreter version from `pyvenv.cfg` contents.
pub fn parse_pyvenv_version(content: &str) -> Option<PythonVersion> {
    content.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        match key.trim() {
            "version" | "version_info" => value.trim().parse().ok(),
            _ => None,
        }
    })
}
