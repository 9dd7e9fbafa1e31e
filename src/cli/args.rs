//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::verify::ProbeMode;

/// ragenv - Find the RAG app's Python environment and verify its dependencies.
#[derive(Debug, Parser)]
#[command(name = "ragenv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (replaces ~/.ragenv/config.yml and .ragenv/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether the selected command prints JSON instead of status lines.
    pub fn json_output(&self) -> bool {
        match &self.command {
            Some(Commands::Check(args)) => args.json,
            Some(Commands::Env(args)) => args.json,
            Some(Commands::Frontend(args)) => args.json,
            _ => false,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that the RAG dependencies load (default if no command specified)
    Check(CheckArgs),

    /// Show where the RAG environment is and what it contains
    Env(EnvArgs),

    /// Check the built front-end assets and list the served endpoints
    Frontend(FrontendArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Modules to check (defaults to the configured dependencies)
    #[arg(value_name = "MODULE")]
    pub modules: Vec<String>,

    /// Probe strategy: import, locate or static
    #[arg(long, env = "RAGENV_MODE")]
    pub mode: Option<ProbeMode>,

    /// Per-dependency timeout in seconds (0 disables)
    #[arg(long, value_name = "SECS", env = "RAGENV_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Python interpreter to probe with
    #[arg(long, value_name = "PATH", env = "RAGENV_PYTHON")]
    pub python: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `env` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EnvArgs {
    /// Python interpreter to report on
    #[arg(long, value_name = "PATH", env = "RAGENV_PYTHON")]
    pub python: Option<PathBuf>,

    /// Also list the interpreter's sys.path
    #[arg(long)]
    pub sys_path: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `frontend` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FrontendArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
