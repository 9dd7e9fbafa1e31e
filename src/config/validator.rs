//! Configuration validation rules.
//!
//! Deserialization already enforces types and known fields. These rules
//! catch values that parse but cannot work:
//! - Dependency modules must be importable names, listed once
//! - Environment directory names must be single path components
//! - The ancestor search depth must stay within `MAX_SEARCH_DEPTH`
//! - The front-end port must be non-zero and endpoints must be absolute

use std::collections::HashSet;
use std::path::Component;

use crate::config::schema::Settings;
use crate::error::{RagEnvError, Result};
use crate::verify::is_valid_module_name;

/// Deepest ancestor walk the locator accepts.
pub const MAX_SEARCH_DEPTH: usize = 64;

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate settings and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_settings(settings: &Settings) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_dependencies(settings));
    errors.extend(validate_environment(settings));
    errors.extend(validate_frontend(settings));

    errors
}

/// Validate settings, failing with every message joined.
pub fn validate(settings: &Settings) -> Result<()> {
    let errors = validate_settings(settings);
    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(RagEnvError::ConfigValidationError { message })
}

fn validate_dependencies(settings: &Settings) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for dep in &settings.dependencies {
        if !is_valid_module_name(&dep.module) {
            errors.push(ValidationError::new(
                "invalid-module",
                format!("Dependency '{}' is not a valid module name", dep.module),
            ));
        }
        if !seen.insert(dep.module.as_str()) {
            errors.push(ValidationError::new(
                "duplicate-dependency",
                format!("Dependency '{}' is listed more than once", dep.module),
            ));
        }
    }

    errors
}

fn validate_environment(settings: &Settings) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for name in &settings.environment.dir_names {
        let mut components = std::path::Path::new(name).components();
        let single = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single {
            errors.push(ValidationError::new(
                "invalid-dir-name",
                format!("Environment directory name '{}' must be a single path component", name),
            ));
        }
    }

    if settings.environment.max_depth > MAX_SEARCH_DEPTH {
        errors.push(ValidationError::new(
            "max-depth",
            format!(
                "environment.max_depth {} exceeds the limit of {}",
                settings.environment.max_depth, MAX_SEARCH_DEPTH
            ),
        ));
    }

    if let Some(home_path) = &settings.environment.home_path {
        if home_path.is_absolute() {
            errors.push(ValidationError::new(
                "absolute-home-path",
                format!(
                    "environment.home_path '{}' must be relative to the home directory",
                    home_path.display()
                ),
            ));
        }
    }

    errors
}

fn validate_frontend(settings: &Settings) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let frontend = &settings.frontend;

    if frontend.port == 0 {
        errors.push(ValidationError::new(
            "invalid-port",
            "frontend.port must be between 1 and 65535",
        ));
    }

    for endpoint in &frontend.endpoints {
        if !endpoint.starts_with('/') {
            errors.push(ValidationError::new(
                "relative-endpoint",
                format!("Endpoint '{}' must start with '/'", endpoint),
            ));
        }
    }

    errors
}
