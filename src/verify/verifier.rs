//! The dependency verifier.
//!
//! Checks names one at a time, in order, on the calling thread, reporting
//! progress through a callback as it goes. The verifier records what it
//! finds and makes no decision about severity; that belongs to the caller.

use std::sync::LazyLock;
use std::time::Instant;

use regex::Regex;

use crate::error::{RagEnvError, Result};

use super::probe::{DependencyProbe, ProbeOutcome};
use super::report::{DependencyCheckResult, VerificationReport};

static MODULE_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("module name regex must compile")
});

/// Whether `name` is a bare, optionally dotted, module name.
pub fn is_valid_module_name(name: &str) -> bool {
    MODULE_NAME_REGEX.is_match(name)
}

/// A progress notification. `index` is zero-based.
#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
    /// A check is about to run.
    Started {
        index: usize,
        total: usize,
        name: &'a str,
    },
    /// A check has completed.
    Finished {
        index: usize,
        total: usize,
        result: &'a DependencyCheckResult,
    },
}

/// Verifies dependencies with a probe.
pub struct Verifier<'p> {
    probe: &'p dyn DependencyProbe,
}

impl<'p> Verifier<'p> {
    pub fn new(probe: &'p dyn DependencyProbe) -> Self {
        Self { probe }
    }

    /// Check every name in order.
    ///
    /// `on_progress` is called exactly twice per name: `Started` before the
    /// probe runs and `Finished` after. Names and the probe's readiness are
    /// checked before the first event, so those failures produce no events.
    /// A probe error for a single name is recorded as `Broken` and checking
    /// continues.
    ///
    /// # Errors
    ///
    /// `EmptyDependencyList` or `InvalidDependencyName` for bad input, and
    /// whatever [`DependencyProbe::ensure_ready`] returns.
    pub fn verify<S, F>(&self, names: &[S], mut on_progress: F) -> Result<VerificationReport>
    where
        S: AsRef<str>,
        F: FnMut(ProgressEvent<'_>),
    {
        if names.is_empty() {
            return Err(RagEnvError::EmptyDependencyList);
        }
        if let Some(bad) = names.iter().find(|n| !is_valid_module_name(n.as_ref())) {
            return Err(RagEnvError::InvalidDependencyName {
                name: bad.as_ref().to_string(),
            });
        }

        self.probe.ensure_ready()?;

        let total = names.len();
        let mut results = Vec::with_capacity(total);

        for (index, name) in names.iter().enumerate() {
            let name = name.as_ref();
            on_progress(ProgressEvent::Started { index, total, name });

            let start = Instant::now();
            let status = self.probe.probe(name).unwrap_or_else(|e| {
                tracing::debug!("Probing {} failed: {}", name, e);
                ProbeOutcome::Broken {
                    detail: e.to_string(),
                }
            });
            let result = DependencyCheckResult {
                name: name.to_string(),
                status,
                elapsed: start.elapsed(),
            };
            tracing::debug!(
                "Checked {} in {:?}: found={}",
                name,
                result.elapsed,
                result.found()
            );

            on_progress(ProgressEvent::Finished {
                index,
                total,
                result: &result,
            });
            results.push(result);
        }

        Ok(VerificationReport::from_results(results))
    }
}
