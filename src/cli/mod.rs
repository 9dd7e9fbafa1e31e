//! Command-line interface for ragenv.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, CompletionsArgs, EnvArgs, FrontendArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
