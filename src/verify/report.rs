//! Verification results.

use std::time::Duration;

use serde::Serialize;

use super::probe::{serialize_millis, ProbeOutcome};

/// Status of one dependency; the probe's outcome as recorded.
pub type DependencyStatus = ProbeOutcome;

/// Result of checking one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCheckResult {
    /// Module name as requested.
    pub name: String,

    /// What the probe found.
    #[serde(flatten)]
    pub status: DependencyStatus,

    /// How long the check took.
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl DependencyCheckResult {
    /// Whether the dependency is present and usable.
    pub fn found(&self) -> bool {
        self.status.is_found()
    }
}

/// Results of a whole verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// One result per requested name, in request order.
    pub results: Vec<DependencyCheckResult>,

    /// Names whose result is not found, in request order.
    pub missing: Vec<String>,
}

impl VerificationReport {
    /// Build a report, deriving `missing` from the results.
    pub fn from_results(results: Vec<DependencyCheckResult>) -> Self {
        let missing = results
            .iter()
            .filter(|r| !r.found())
            .map(|r| r.name.clone())
            .collect();
        Self { results, missing }
    }

    /// Whether every dependency was found.
    pub fn all_found(&self) -> bool {
        self.missing.is_empty()
    }

    /// Total time spent checking.
    pub fn total_elapsed(&self) -> Duration {
        self.results.iter().map(|r| r.elapsed).sum()
    }
}
