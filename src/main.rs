//! ragenv CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ragenv::cli::commands::EXIT_ERROR;
use ragenv::cli::{Cli, CommandDispatcher};
use ragenv::config::find_project_root;
use ragenv::process::is_ci;
use ragenv::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("ragenv=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ragenv=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// `--project`, else the nearest directory with `.ragenv` or `.git`, else
/// the current directory.
fn project_root(cli: &Cli) -> PathBuf {
    if let Some(project) = &cli.project {
        return project.clone();
    }
    let cwd = std::env::current_dir().unwrap_or_default();
    find_project_root(&cwd).unwrap_or(cwd)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("ragenv starting with args: {:?}", cli);

    let json = cli.json_output();
    let output_mode = if json {
        OutputMode::Normal
    } else {
        OutputMode::from_flags(cli.verbose, cli.quiet)
    };

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut ui = create_ui(!json && !is_ci(), output_mode);

    let dispatcher =
        CommandDispatcher::new(project_root(&cli)).with_config_override(cli.config.clone());

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(EXIT_ERROR as u8)
        }
    }
}
