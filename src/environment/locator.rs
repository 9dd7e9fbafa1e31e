//! Environment locator.
//!
//! Finds the virtual environment the application expects to run under,
//! whether or not it is the one currently active. The search order is fixed:
//!
//! 1. The active environment (marker variable or interpreter sentinel)
//! 2. Each configured venv directory name in the working directory and its
//!    ancestors, up to `max_depth` levels up
//! 3. The configured location under the home directory
//!
//! The locator only reads the filesystem. It never writes, and it never
//! touches the module search path; see [`SearchPath`](super::SearchPath).
//!
//! # Example
//!
//! ```no_run
//! use ragenv::config::EnvironmentSettings;
//! use ragenv::environment::EnvironmentLocator;
//!
//! let locator = EnvironmentLocator::from_process(&EnvironmentSettings::default());
//! match locator.locate() {
//!     Some(env) => println!("RAG environment: {}", env.path.display()),
//!     None => println!("No RAG environment found"),
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::config::EnvironmentSettings;

use super::candidate::{looks_like_environment, CandidateSource, EnvironmentCandidate, PYVENV_CFG};
use super::platform::Platform;

/// Locates the application's virtual environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLocator {
    settings: EnvironmentSettings,
    platform: Platform,
    cwd: PathBuf,
    home: Option<PathBuf>,
    /// Values of the marker variables that were set, in configured order.
    markers: Vec<(String, PathBuf)>,
    /// The interpreter this process would run, for the sentinel check.
    interpreter: Option<PathBuf>,
}

impl EnvironmentLocator {
    /// Build a locator from the real process environment.
    pub fn from_process(settings: &EnvironmentSettings) -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::with_env(settings, cwd, dirs::home_dir(), |key: &str| std::env::var(key))
    }

    /// Build a locator with an explicit working directory, home directory
    /// and environment variable lookup.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn with_env<F>(
        settings: &EnvironmentSettings,
        cwd: PathBuf,
        home: Option<PathBuf>,
        env_fn: F,
    ) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let markers = settings
            .marker_vars
            .iter()
            .filter_map(|var| {
                let value = env_fn(var).ok().filter(|v| !v.trim().is_empty())?;
                Some((var.clone(), PathBuf::from(value)))
            })
            .collect();

        Self {
            settings: settings.clone(),
            platform: Platform::current(),
            cwd,
            home,
            markers,
            interpreter: None,
        }
    }

    /// Use `interpreter` for the sentinel check (`<root>/bin/python` with
    /// `<root>/pyvenv.cfg` next to `bin/`).
    pub fn with_interpreter(mut self, interpreter: Option<PathBuf>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Override the platform layout.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// The platform layout this locator assumes.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Marker variables that were set, with their values.
    pub fn markers(&self) -> &[(String, PathBuf)] {
        &self.markers
    }

    /// Whether the process is running inside a recognizable environment.
    pub fn is_active(&self) -> bool {
        self.active_root().is_some()
    }

    /// Root of the active environment, if any.
    pub fn active_root(&self) -> Option<PathBuf> {
        for (var, root) in &self.markers {
            if looks_like_environment(root, self.platform) {
                tracing::debug!("Active environment from {}: {}", var, root.display());
                return Some(root.clone());
            }
            tracing::debug!("{} points at {}, which is not an environment", var, root.display());
        }

        let root = self.interpreter.as_deref().and_then(sentinel_root)?;
        tracing::debug!("Active environment from interpreter sentinel: {}", root.display());
        Some(root)
    }

    /// Find the expected environment.
    ///
    /// Returns the first location that exists and looks like a virtual
    /// environment, or `None` when the search is exhausted.
    pub fn locate(&self) -> Option<EnvironmentCandidate> {
        if let Some(root) = self.active_root() {
            return Some(self.inspect(root, CandidateSource::Active, None));
        }

        for (path, source) in self.search_locations() {
            let candidate = self.inspect(path, source, None);
            tracing::trace!(
                "Candidate {} exists={}",
                candidate.path.display(),
                candidate.exists
            );
            if candidate.is_valid(self.platform) {
                tracing::debug!("Located environment at {}", candidate.path.display());
                return Some(candidate);
            }
        }

        tracing::debug!("No environment found");
        None
    }

    /// Every location [`locate`](Self::locate) would consider, in order.
    pub fn candidates(&self) -> Vec<EnvironmentCandidate> {
        let mut candidates = Vec::new();
        let active = self.active_root();
        if let Some(root) = &active {
            candidates.push(self.inspect(root.clone(), CandidateSource::Active, None));
        }
        for (path, source) in self.search_locations() {
            candidates.push(self.inspect(path, source, active.as_deref()));
        }
        candidates
    }

    /// Ancestor and home locations, without the active environment.
    fn search_locations(&self) -> Vec<(PathBuf, CandidateSource)> {
        let mut locations = Vec::new();

        for (depth, dir) in self
            .cwd
            .ancestors()
            .take(self.settings.max_depth.saturating_add(1))
            .enumerate()
        {
            for name in &self.settings.dir_names {
                locations.push((dir.join(name), CandidateSource::Ancestor { depth }));
            }
        }

        if let (Some(home), Some(rel)) = (&self.home, &self.settings.home_path) {
            locations.push((home.join(rel), CandidateSource::Home));
        }

        locations
    }

    fn inspect(
        &self,
        path: PathBuf,
        source: CandidateSource,
        active_root: Option<&Path>,
    ) -> EnvironmentCandidate {
        let active =
            matches!(source, CandidateSource::Active) || active_root.is_some_and(|root| root == path);
        EnvironmentCandidate::inspect(path, source, active, self.platform)
    }
}

/// Environment root for an interpreter living in `<root>/bin` or
/// `<root>/Scripts` next to a `pyvenv.cfg`.
fn sentinel_root(interpreter: &Path) -> Option<PathBuf> {
    let root = interpreter.parent()?.parent()?;
    if root.join(PYVENV_CFG).is_file() {
        Some(root.to_path_buf())
    } else {
        None
    }
}
