//! Frontend command implementation.
//!
//! The `ragenv frontend` command checks the built front-end assets and
//! lists the URLs the server would expose. It does not start a server.

use std::path::{Path, PathBuf};

use crate::cli::args::FrontendArgs;
use crate::config::Settings;
use crate::error::{RagEnvError, Result};
use crate::frontend::check_frontend;
use crate::ui::{StatusKind, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The frontend command implementation.
pub struct FrontendCommand {
    project_root: PathBuf,
    settings: Settings,
    args: FrontendArgs,
}

impl FrontendCommand {
    /// Create a new frontend command.
    pub fn new(project_root: &Path, settings: Settings, args: FrontendArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            settings,
            args,
        }
    }
}

impl Command for FrontendCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = check_frontend(&self.project_root, &self.settings.frontend);

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&report).map_err(|e| RagEnvError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::from_check(report.complete()));
        }

        if !report.dist_exists {
            ui.error(&format!(
                "Frontend directory not found: {}",
                report.dist_dir.display()
            ));
            ui.show_hint("Build the front-end first");
            return Ok(CommandResult::from_check(false));
        }

        ui.show_header("Frontend files");
        for asset in &report.assets {
            ui.message(&format!(
                "{} {}",
                StatusKind::from(asset.exists).bracketed(),
                asset.asset.display()
            ));
        }

        if !report.complete() {
            ui.error("Missing frontend files!");
            return Ok(CommandResult::from_check(false));
        }

        ui.show_header("Endpoints");
        for url in &report.endpoints {
            ui.message(&format!("  - {}", url));
        }
        ui.success(&format!(
            "Frontend would be available at: {}/app",
            report.base_url
        ));

        Ok(CommandResult::success())
    }
}
