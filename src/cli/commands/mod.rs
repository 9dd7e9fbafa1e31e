//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`ragenv check`, `ragenv env`)
//! - Shared configuration loading
//! - Consistent global flag handling

pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod env;
pub mod frontend;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, EXIT_ERROR, EXIT_MISSING, EXIT_OK};
