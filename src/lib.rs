//! ragenv - Locate the RAG application's Python environment and verify
//! that its machine-learning dependencies load.
//!
//! The application runs inside a dedicated virtual environment that may or
//! may not be the active one. ragenv finds it, derives where its packages
//! live, and checks each required dependency with a pluggable probe.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Layered YAML settings
//! - [`environment`] - Environment location and package directory derivation
//! - [`error`] - Error types and result aliases
//! - [`frontend`] - Front-end build checks
//! - [`process`] - Child process execution
//! - [`ui`] - Spinners and terminal output
//! - [`verify`] - Dependency probes and verification
//!
//! # Example
//!
//! ```
//! use ragenv::verify::{DependencyMetadata, ProbeOutcome, Verifier};
//!
//! let probe = |name: &str| -> ragenv::Result<ProbeOutcome> {
//!     Ok(if name == "torch" {
//!         ProbeOutcome::Found(DependencyMetadata::default())
//!     } else {
//!         ProbeOutcome::NotFound
//!     })
//! };
//!
//! let report = Verifier::new(&probe).verify(&["torch", "chromadb"], |_| {}).unwrap();
//! assert_eq!(report.missing, vec!["chromadb"]);
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod frontend;
pub mod process;
pub mod ui;
pub mod verify;

pub use error::{RagEnvError, Result};
