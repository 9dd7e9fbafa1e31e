//! Dependency verification.
//!
//! [`Verifier`] runs a [`DependencyProbe`] over a list of module names and
//! collects a [`VerificationReport`]. Three probes are provided:
//!
//! - [`ImportProbe`] imports (or only locates) each module in a child
//!   interpreter
//! - [`StaticProbe`] scans a package directory without running Python
//! - any `Fn(&str) -> Result<ProbeOutcome>`
//!
//! # Example
//!
//! ```
//! use ragenv::verify::{DependencyMetadata, ProbeOutcome, ProgressEvent, Verifier};
//!
//! let probe = |name: &str| -> ragenv::Result<ProbeOutcome> {
//!     Ok(match name {
//!         "torch" => ProbeOutcome::Found(DependencyMetadata::default()),
//!         _ => ProbeOutcome::NotFound,
//!     })
//! };
//!
//! let report = Verifier::new(&probe)
//!     .verify(&["torch", "chromadb"], |event| {
//!         if let ProgressEvent::Started { name, .. } = event {
//!             println!("Checking {}...", name);
//!         }
//!     })
//!     .unwrap();
//!
//! assert_eq!(report.missing, vec!["chromadb"]);
//! ```

pub mod import_probe;
pub mod probe;
pub mod report;
pub mod static_probe;
pub mod verifier;

pub use import_probe::{ImportMode, ImportProbe};
pub use probe::{DependencyMetadata, DependencyProbe, ProbeMode, ProbeOutcome};
pub use report::{DependencyCheckResult, DependencyStatus, VerificationReport};
pub use static_probe::StaticProbe;
pub use verifier::{is_valid_module_name, ProgressEvent, Verifier};
