//! Environment resolution.
//!
//! This module finds the virtual environment the application expects and
//! derives where its packages live. Nothing here writes to disk or changes
//! process state.
//!
//! # Modules
//!
//! - [`candidate`] - Locations considered during the search
//! - [`interpreter`] - Python interpreter discovery and queries
//! - [`locator`] - The ordered environment search
//! - [`package_dir`] - Platform-aware `site-packages` derivation
//! - [`platform`] - Platform layouts and Python versions
//! - [`search_path`] - Explicit push/pop search path for child interpreters

pub mod candidate;
pub mod interpreter;
pub mod locator;
pub mod package_dir;
pub mod platform;
pub mod search_path;

pub use candidate::{CandidateSource, EnvironmentCandidate};
pub use interpreter::Interpreter;
pub use locator::EnvironmentLocator;
pub use package_dir::package_directory;
pub use platform::{Platform, PythonVersion};
pub use search_path::SearchPath;
