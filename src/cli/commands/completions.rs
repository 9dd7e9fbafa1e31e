//! Shell completions generation.
//!
//! The `ragenv completions` command generates shell completion scripts.

use std::io::Write;

use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a new completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }

    /// Write the completion script for the configured shell to `out`.
    pub fn write_to(&self, out: &mut dyn Write) {
        let mut cmd = Cli::command();
        clap_complete::generate(self.args.shell, &mut cmd, "ragenv", out);
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        self.write_to(&mut std::io::stdout());
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_complete::Shell;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        CompletionsCommand::new(CompletionsArgs { shell }).write_to(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn generates_bash_completions() {
        let output = script(Shell::Bash);
        assert!(output.contains("ragenv"));
        assert!(output.contains("complete"));
    }

    #[test]
    fn completions_include_subcommands() {
        let output = script(Shell::Zsh);
        assert!(output.contains("check"));
        assert!(output.contains("frontend"));
    }

    #[test]
    fn generates_fish_completions() {
        assert!(script(Shell::Fish).contains("ragenv"));
    }
}
