//! Platform layout and Python version handling.
//!
//! Virtual environments are laid out differently on Windows (`Scripts\`,
//! `Lib\site-packages`) than everywhere else (`bin/`,
//! `lib/pythonX.Y/site-packages`). [`Platform`] captures that difference so
//! path derivation stays a pure function of its inputs.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::RagEnvError;

/// Matches `3.11`, `3.11.4`, `Python 3.11.4`, `3.12.0rc1` (patch = 0).
static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("VERSION_REGEX must compile")
});

/// Virtual environment directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux, macOS and other Unix-likes.
    Posix,
    /// Windows.
    Windows,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// Interpreter binaries an environment rooted at `root` may contain,
    /// in preference order.
    pub fn interpreter_paths(self, root: &Path) -> Vec<PathBuf> {
        match self {
            Platform::Posix => vec![
                root.join("bin").join("python3"),
                root.join("bin").join("python"),
            ],
            Platform::Windows => vec![root.join("Scripts").join("python.exe")],
        }
    }

    /// Directory under an environment root holding per-version lib dirs.
    pub fn lib_dir(self, root: &Path) -> PathBuf {
        match self {
            Platform::Posix => root.join("lib"),
            Platform::Windows => root.join("Lib"),
        }
    }
}

/// A Python interpreter version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl PythonVersion {
    /// Create a version without a patch component.
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Name of the per-version lib directory, e.g. `python3.11`.
    pub fn lib_dir_name(&self) -> String {
        format!("python{}.{}", self.major, self.minor)
    }

    /// Parse a lib directory name such as `python3.11`.
    ///
    /// Returns `None` for anything else (`python3`, `site-python`, ...).
    pub fn from_lib_dir_name(name: &str) -> Option<Self> {
        let rest = name.strip_prefix("python")?;
        let (major, minor) = rest.split_once('.')?;
        Some(Self::new(major.parse().ok()?, minor.parse().ok()?))
    }
}

impl FromStr for PythonVersion {
    type Err = RagEnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RagEnvError::InvalidVersion {
            value: s.trim().to_string(),
        };
        let caps = VERSION_REGEX.captures(s).ok_or_else(invalid)?;
        let major = caps[1].parse().map_err(|_| invalid())?;
        let minor = caps[2].parse().map_err(|_| invalid())?;
        let patch = match caps.get(3) {
            Some(m) => Some(m.as_str().parse().map_err(|_| invalid())?),
            None => None,
        };
        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_major_minor() {
        let v: PythonVersion = "3.11".parse().unwrap();
        assert_eq!(v, PythonVersion::new(3, 11));
    }

    #[test]
    fn parses_full_version_with_prefix() {
        let v: PythonVersion = "Python 3.11.4\n".parse().unwrap();
        assert_eq!(v.major, 3);
        assert_eq!(v.minor, 11);
        assert_eq!(v.patch, Some(4));
    }

    #[test]
    fn parses_release_candidate() {
        let v: PythonVersion = "3.13.0rc2".parse().unwrap();
        assert_eq!(v.patch, Some(0));
    }

    #[test]
    fn rejects_garbage() {
        let err = "not a version".parse::<PythonVersion>().unwrap_err();
        assert!(matches!(err, RagEnvError::InvalidVersion { .. }));
    }

    #[test]
    fn display_omits_missing_patch() {
        assert_eq!(PythonVersion::new(3, 10).to_string(), "3.10");
        let full: PythonVersion = "3.10.12".parse().unwrap();
        assert_eq!(full.to_string(), "3.10.12");
    }

    #[test]
    fn lib_dir_name_ignores_patch() {
        let v: PythonVersion = "3.12.1".parse().unwrap();
        assert_eq!(v.lib_dir_name(), "python3.12");
    }

    #[test]
    fn from_lib_dir_name_accepts_only_versioned_dirs() {
        assert_eq!(
            PythonVersion::from_lib_dir_name("python3.9"),
            Some(PythonVersion::new(3, 9))
        );
        assert_eq!(PythonVersion::from_lib_dir_name("python3"), None);
        assert_eq!(PythonVersion::from_lib_dir_name("site-python"), None);
    }

    #[test]
    fn posix_interpreter_paths_prefer_python3() {
        let paths = Platform::Posix.interpreter_paths(Path::new("/venv"));
        assert_eq!(paths[0], Path::new("/venv/bin/python3"));
        assert_eq!(paths[1], Path::new("/venv/bin/python"));
    }

    #[test]
    fn windows_interpreter_lives_in_scripts() {
        let paths = Platform::Windows.interpreter_paths(Path::new("venv"));
        assert_eq!(paths, vec![Path::new("venv").join("Scripts").join("python.exe")]);
    }
}
