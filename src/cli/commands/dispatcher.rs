//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{CheckArgs, Cli, Commands};
use crate::config::{self, Settings};
use crate::error::Result;
use crate::ui::UserInterface;

/// Exit code when every check passed.
pub const EXIT_OK: i32 = 0;

/// Exit code when a check found something missing.
pub const EXIT_MISSING: i32 = 1;

/// Exit code for configuration and environment errors.
pub const EXIT_ERROR: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: EXIT_OK,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success if `ok`, otherwise [`EXIT_MISSING`].
    pub fn from_check(ok: bool) -> Self {
        if ok {
            Self::success()
        } else {
            Self::failure(EXIT_MISSING)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config_override: None,
        }
    }

    /// Load configuration from `path` instead of the discovered files.
    pub fn with_config_override(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load and validate the settings for this project.
    pub fn settings(&self) -> Result<Settings> {
        let settings = config::load_settings(&self.project_root, self.config_override.as_deref())?;
        config::validate(&settings)?;
        Ok(settings)
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. No subcommand means `check` with default arguments.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Check(args)) => {
                let cmd = super::check::CheckCommand::new(
                    &self.project_root,
                    self.settings()?,
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Some(Commands::Env(args)) => {
                let cmd =
                    super::env::EnvCommand::new(&self.project_root, self.settings()?, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Frontend(args)) => {
                let cmd = super::frontend::FrontendCommand::new(
                    &self.project_root,
                    self.settings()?,
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                let cmd = super::check::CheckCommand::new(
                    &self.project_root,
                    self.settings()?,
                    CheckArgs::default(),
                );
                cmd.execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(EXIT_ERROR);
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn from_check_maps_to_missing() {
        assert_eq!(CommandResult::from_check(true).exit_code, EXIT_OK);
        assert_eq!(CommandResult::from_check(false).exit_code, EXIT_MISSING);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".ragenv")).unwrap();
        fs::write(
            temp.path().join(".ragenv/config.yml"),
            "dependencies:\n  - module: torch>=2\n",
        )
        .unwrap();

        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf());
        assert!(dispatcher.settings().is_err());
    }

    #[test]
    fn dispatches_frontend() {
        let temp = TempDir::new().unwrap();
        let dispatcher = CommandDispatcher::new(temp.path().to_path_buf())
            .with_config_override(Some(temp.path().join("none.yml")));
        let cli = Cli::parse_from(["ragenv", "frontend"]);
        let mut ui = MockUI::new();

        // The override file does not exist.
        assert!(dispatcher.dispatch(&cli, &mut ui).is_err());

        fs::write(temp.path().join("none.yml"), "").unwrap();
        let result = dispatcher.dispatch(&cli, &mut ui).unwrap();
        assert_eq!(result.exit_code, EXIT_MISSING);
    }
}
