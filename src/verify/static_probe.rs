//! Probing dependencies by scanning a package directory.
//!
//! No interpreter is involved, so this works when the environment's Python
//! cannot run at all. It cannot detect import-time failures, only missing
//! files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::probe::{DependencyMetadata, DependencyProbe, ProbeOutcome};

const DIST_INFO_SUFFIX: &str = ".dist-info";
const EXTENSION_SUFFIXES: &[&str] = &[".so", ".pyd"];

/// Probes dependencies by looking for their files in a package directory.
#[derive(Debug, Clone)]
pub struct StaticProbe {
    package_dir: PathBuf,
}

impl StaticProbe {
    /// Create a probe over `package_dir` (usually a `site-packages`).
    pub fn new(package_dir: impl Into<PathBuf>) -> Self {
        Self {
            package_dir: package_dir.into(),
        }
    }

    /// The directory being scanned.
    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    /// Where the module's files live, if anywhere.
    fn module_location(&self, name: &str) -> Option<PathBuf> {
        let mut parts: Vec<&str> = name.split('.').collect();
        let leaf = parts.pop()?;
        let parent = parts
            .iter()
            .fold(self.package_dir.clone(), |dir, part| dir.join(part));

        let package = parent.join(leaf);
        if package.is_dir() {
            return Some(package);
        }

        let source = parent.join(format!("{}.py", leaf));
        if source.is_file() {
            return Some(source);
        }

        // Compiled extensions carry an ABI tag: `_C.cpython-311-x86_64-linux-gnu.so`.
        let prefix = format!("{}.", leaf);
        fs::read_dir(&parent)
            .ok()?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .find(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| {
                        n.starts_with(&prefix) && EXTENSION_SUFFIXES.iter().any(|s| n.ends_with(s))
                    })
            })
    }

    /// Whether `name` is a submodule whose top-level package has files.
    fn has_installed_parent(&self, name: &str) -> bool {
        match name.split_once('.') {
            Some((top, _)) => self.module_location(top).is_some(),
            None => false,
        }
    }

    /// The install record for the distribution named like the top-level
    /// package, with the version it records.
    fn install_record(&self, name: &str) -> Option<(PathBuf, Option<String>)> {
        let top = normalize(name.split('.').next()?);

        fs::read_dir(&self.package_dir)
            .ok()?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .find_map(|path| {
                let dir_name = path.file_name()?.to_str()?;
                let stem = dir_name.strip_suffix(DIST_INFO_SUFFIX)?;
                let (dist, dir_version) = stem.split_once('-')?;
                if normalize(dist) != top {
                    return None;
                }
                let version = metadata_version(&path).or_else(|| Some(dir_version.to_string()));
                Some((path, version))
            })
    }
}

impl DependencyProbe for StaticProbe {
    fn probe(&self, name: &str) -> Result<ProbeOutcome> {
        if !self.package_dir.is_dir() {
            tracing::debug!(
                "Package directory {} does not exist",
                self.package_dir.display()
            );
            return Ok(ProbeOutcome::NotFound);
        }

        let location = self.module_location(name);
        let record = self.install_record(name);

        let outcome = match (location, record) {
            (Some(location), record) => ProbeOutcome::Found(DependencyMetadata {
                version: record.and_then(|(_, v)| v),
                location: Some(location),
            }),
            // The package is installed; only the requested submodule is absent.
            (None, Some(_)) if self.has_installed_parent(name) => ProbeOutcome::NotFound,
            (None, Some((record, _))) => ProbeOutcome::Broken {
                detail: format!(
                    "{} is present but the module files are missing",
                    record.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
                ),
            },
            (None, None) => ProbeOutcome::NotFound,
        };

        Ok(outcome)
    }
}

/// Distribution names compare case-insensitively with `-`, `_` and `.`
/// treated alike.
fn normalize(name: &str) -> String {
    name.to_ascii_lowercase().replace(['-', '.'], "_")
}

/// The `Version:` header of a dist-info's `METADATA` file.
fn metadata_version(dist_info: &Path) -> Option<String> {
    let content = fs::read_to_string(dist_info.join("METADATA")).ok()?;
    content
        .lines()
        .take_while(|l| !l.is_empty())
        .find_map(|l| l.strip_prefix("Version:"))
        .map(|v| v.trim().to_string())
}
