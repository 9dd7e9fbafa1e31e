//! The dependency probe seam.
//!
//! A probe answers one question for one module name: is it there, and if
//! so, what do we know about it. Absence is an ordinary answer. Only a
//! failure of the probing machinery itself (the interpreter cannot be
//! started) is an `Err`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::Result;

/// What a probe learned about a dependency it found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyMetadata {
    /// Installed version, when the package exposes one.
    #[serde(default)]
    pub version: Option<String>,

    /// Where the module was found.
    #[serde(default)]
    pub location: Option<PathBuf>,
}

/// Result of probing one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Present and usable.
    Found(DependencyMetadata),

    /// Not installed.
    NotFound,

    /// Installed but unusable: importing it raised, or its files are
    /// incomplete.
    Broken { detail: String },

    /// The check did not finish in time.
    TimedOut {
        #[serde(rename = "after_ms", serialize_with = "serialize_millis")]
        after: Duration,
    },
}

impl ProbeOutcome {
    /// Whether the dependency counts as present.
    pub fn is_found(&self) -> bool {
        matches!(self, ProbeOutcome::Found(_))
    }

    /// Metadata, if found.
    pub fn metadata(&self) -> Option<&DependencyMetadata> {
        match self {
            ProbeOutcome::Found(meta) => Some(meta),
            _ => None,
        }
    }
}

pub(crate) fn serialize_millis<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Checks whether a single dependency is present.
pub trait DependencyProbe {
    /// Probe the module `name`.
    fn probe(&self, name: &str) -> Result<ProbeOutcome>;

    /// Fail if the probe cannot run at all, before any dependency is checked.
    fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }
}

impl<F> DependencyProbe for F
where
    F: Fn(&str) -> Result<ProbeOutcome>,
{
    fn probe(&self, name: &str) -> Result<ProbeOutcome> {
        self(name)
    }
}

/// Which probe strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// Import the module in a child interpreter.
    #[default]
    Import,
    /// Resolve the module in a child interpreter without importing it.
    Locate,
    /// Scan the package directory; no interpreter needed.
    Static,
}

impl fmt::Display for ProbeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProbeMode::Import => "import",
            ProbeMode::Locate => "locate",
            ProbeMode::Static => "static",
        };
        f.write_str(s)
    }
}

impl FromStr for ProbeMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "import" => Ok(ProbeMode::Import),
            "locate" => Ok(ProbeMode::Locate),
            "static" => Ok(ProbeMode::Static),
            other => Err(format!(
                "unknown probe mode '{}' (expected import, locate or static)",
                other
            )),
        }
    }
}
