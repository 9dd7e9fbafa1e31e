//! Explicit module search path for child interpreters.
//!
//! Discovery never touches the search path. A caller that wants an
//! environment's packages importable pushes the package directory here, runs
//! its probes, and pops it again. The stack is exported to child processes as
//! `PYTHONPATH`; this process's own environment is never modified.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::Result;

/// Environment variable the stack is exported through.
pub const PYTHONPATH: &str = "PYTHONPATH";

/// A push/pop stack of directories prepended to the inherited `PYTHONPATH`.
///
/// # Example
///
/// ```
/// use ragenv::environment::SearchPath;
///
/// let mut path = SearchPath::new();
/// path.push("/envs/rag/lib/python3.11/site-packages");
/// assert_eq!(path.len(), 1);
/// assert!(path.pop().is_some());
/// assert!(path.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    /// Pushed entries, oldest first. The newest entry has highest priority.
    entries: Vec<PathBuf>,
    /// `PYTHONPATH` inherited from the parent process.
    inherited: Option<OsString>,
}

impl SearchPath {
    /// Create an empty stack that ignores any inherited `PYTHONPATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack layered over this process's `PYTHONPATH`.
    pub fn inherit() -> Self {
        Self {
            entries: Vec::new(),
            inherited: std::env::var_os(PYTHONPATH).filter(|v| !v.is_empty()),
        }
    }

    /// Create an empty stack layered over an explicit base value.
    pub fn with_base(base: impl Into<OsString>) -> Self {
        Self {
            entries: Vec::new(),
            inherited: Some(base.into()).filter(|v| !v.is_empty()),
        }
    }

    /// Push a directory; it takes priority over everything already present.
    ///
    /// Returns the new depth of the stack.
    pub fn push(&mut self, dir: impl Into<PathBuf>) -> usize {
        let dir = dir.into();
        tracing::debug!("Pushing {} onto search path", dir.display());
        self.entries.push(dir);
        self.entries.len()
    }

    /// Remove and return the most recently pushed directory.
    pub fn pop(&mut self) -> Option<PathBuf> {
        let popped = self.entries.pop();
        if let Some(dir) = &popped {
            tracing::debug!("Popped {} from search path", dir.display());
        }
        popped
    }

    /// Whether `dir` is currently pushed.
    pub fn contains(&self, dir: &Path) -> bool {
        self.entries.iter().any(|e| e == dir)
    }

    /// Number of pushed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Effective entries in priority order: newest push first, then the
    /// inherited value.
    pub fn effective(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.entries.iter().rev().cloned().collect();
        if let Some(base) = &self.inherited {
            paths.extend(std::env::split_paths(base));
        }
        paths
    }

    /// Value to set as `PYTHONPATH` for a child, or `None` to leave it unset.
    pub fn to_env_value(&self) -> Result<Option<OsString>> {
        let paths = self.effective();
        if paths.is_empty() {
            return Ok(None);
        }
        let joined = std::env::join_paths(&paths).context("search path entry contains a separator")?;
        Ok(Some(joined))
    }
}
