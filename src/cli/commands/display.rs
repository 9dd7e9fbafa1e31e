//! Shared display helpers for dependency and path formatting.
//!
//! Used by `check` and `env` so a dependency's outcome reads the same
//! wherever it is shown.

use std::path::Path;

use crate::ui::{format_duration, SpinnerHandle, StatusKind, UserInterface};
use crate::verify::{DependencyCheckResult, DependencyStatus};

/// `yes` / `no`.
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// A path, or `None` when absent.
pub fn path_or_none(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "None".to_string())
}

/// One-line outcome for a dependency, e.g. `PyTorch loaded (2.1s)`.
///
/// `found_verb` is what "found" means for the probe used: `loaded` when
/// the module was imported, `found` otherwise.
pub fn outcome_line(label: &str, result: &DependencyCheckResult, found_verb: &str) -> String {
    match &result.status {
        DependencyStatus::Found(_) => {
            format!("{} {} ({})", label, found_verb, format_duration(result.elapsed))
        }
        DependencyStatus::NotFound => format!("{} not found", label),
        DependencyStatus::Broken { detail } => format!("{} is broken: {}", label, detail),
        DependencyStatus::TimedOut { after } => {
            format!("{} timed out after {}", label, format_duration(*after))
        }
    }
}

/// Finish a dependency's spinner according to its outcome.
pub fn finish_dependency(
    spinner: &mut dyn SpinnerHandle,
    label: &str,
    result: &DependencyCheckResult,
    found_verb: &str,
) {
    let line = outcome_line(label, result, found_verb);
    match StatusKind::from(&result.status) {
        StatusKind::Success => spinner.finish_success(&line),
        StatusKind::Warning => spinner.finish_warning(&line),
        _ => spinner.finish_error(&line),
    }
}

/// Show version and location of a found dependency.
pub fn show_dependency_details(ui: &mut dyn UserInterface, result: &DependencyCheckResult) {
    if let Some(meta) = result.status.metadata() {
        ui.show_field("Version", meta.version.as_deref().unwrap_or("unknown"));
        ui.show_field("Location", &path_or_none(meta.location.as_deref()));
    }
}
