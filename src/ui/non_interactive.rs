//! Non-interactive UI for CI, pipes and `--json` runs.
//!
//! No spinners are drawn. The start of each operation is printed once and
//! its outcome is printed as its own line, so logs read top to bottom.

use super::{OutputMode, SpinnerHandle, StatusKind, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Status lines go to stdout; warnings and errors go to stderr.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", StatusKind::Success.format_plain(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", StatusKind::Warning.format_plain(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", StatusKind::Failed.format_plain(msg));
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() && !crate::process::is_ci() {
            println!("{}", StatusKind::Running.format_plain(message));
        }
        Box::new(LineSpinner {
            visible: self.mode.shows_spinners(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_info() {
            println!("=== {} ===", title);
        }
    }

    fn show_field(&mut self, key: &str, value: &str) {
        if self.mode.shows_info() {
            println!("  {}: {}", key, value);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_info() {
            println!("  {}", hint);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints its outcome as a plain line.
struct LineSpinner {
    visible: bool,
}

impl LineSpinner {
    fn finish(&self, kind: StatusKind, msg: &str) {
        if self.visible {
            println!("{}", kind.format_plain(msg));
        }
    }
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        self.finish(StatusKind::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(StatusKind::Failed, msg);
    }

    fn finish_warning(&mut self, msg: &str) {
        self.finish(StatusKind::Warning, msg);
    }
}
