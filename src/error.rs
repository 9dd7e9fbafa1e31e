//! Error types for ragenv operations.
//!
//! This module defines [`RagEnvError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - A missing environment is not an error: the locator returns `None`
//! - A missing dependency is not an error: it is recorded in the report
//! - `RagEnvError` covers conditions that stop an operation outright
//!   (bad configuration, an interpreter that cannot run at all)
//! - Use `anyhow::Error` (via `RagEnvError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ragenv operations.
#[derive(Debug, Error)]
pub enum RagEnvError {
    /// Configuration file not found at the given location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// No Python interpreter could be found.
    #[error("Python interpreter not found (tried: {tried})")]
    InterpreterNotFound { tried: String },

    /// The interpreter exists but could not be run.
    #[error("Python interpreter {interpreter} failed: {message}")]
    InterpreterFailed {
        interpreter: PathBuf,
        message: String,
    },

    /// A command needed an environment and none was found.
    #[error("No RAG environment found (searched {searched} locations)")]
    EnvironmentNotFound { searched: usize },

    /// Verification was asked to check nothing.
    #[error("No dependencies to check")]
    EmptyDependencyList,

    /// A dependency name is not a bare module identifier.
    #[error("Invalid dependency name '{name}': expected a module name such as 'torch'")]
    InvalidDependencyName { name: String },

    /// A Python version string could not be parsed.
    #[error("Invalid Python version: {value}")]
    InvalidVersion { value: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for ragenv operations.
pub type Result<T> = std::result::Result<T, RagEnvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = RagEnvError::ConfigParseError {
            path: PathBuf::from("/project/.ragenv/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/project/.ragenv/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn config_not_found_displays_path() {
        let err = RagEnvError::ConfigNotFound {
            path: PathBuf::from("/tmp/custom.yml"),
        };
        assert!(err.to_string().contains("/tmp/custom.yml"));
    }

    #[test]
    fn interpreter_not_found_lists_candidates() {
        let err = RagEnvError::InterpreterNotFound {
            tried: "python3, python".into(),
        };
        assert!(err.to_string().contains("python3, python"));
    }

    #[test]
    fn interpreter_failed_displays_path_and_message() {
        let err = RagEnvError::InterpreterFailed {
            interpreter: PathBuf::from("/venv/bin/python3"),
            message: "permission denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/venv/bin/python3"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn environment_not_found_displays_count() {
        let err = RagEnvError::EnvironmentNotFound { searched: 7 };
        assert!(err.to_string().contains("7 locations"));
    }

    #[test]
    fn invalid_dependency_name_displays_name() {
        let err = RagEnvError::InvalidDependencyName {
            name: "torch>=2.0".into(),
        };
        assert!(err.to_string().contains("torch>=2.0"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: RagEnvError = io_err.into();
        assert!(matches!(err, RagEnvError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(RagEnvError::EmptyDependencyList)
        }
        assert!(returns_error().is_err());
    }
}
