//! Visual theme and styling.

use console::Style;

use super::icons::StatusKind;

/// ragenv's visual theme.
#[derive(Debug, Clone)]
pub struct RagEnvTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for running elements (cyan).
    pub info: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted text (bold).
    pub highlight: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for durations (dim).
    pub duration: Style,
    /// Style for key labels in key-value displays (bold).
    pub key: Style,
    /// Style for contextual hints (cyan dim).
    pub hint: Style,
}

impl Default for RagEnvTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl RagEnvTheme {
    /// Create the colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            duration: Style::new().dim(),
            key: Style::new().bold(),
            hint: Style::new().cyan().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            duration: Style::new(),
            key: Style::new(),
            hint: Style::new(),
        }
    }

    /// Pick the colored or plain theme for the current terminal.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        StatusKind::Success.format(self, &self.success.apply_to(msg).to_string())
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        StatusKind::Warning.format(self, &self.warning.apply_to(msg).to_string())
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        StatusKind::Failed.format(self, &self.error.apply_to(msg).to_string())
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("=== {} ===", title)))
    }

    /// Format a key/value line.
    pub fn format_field(&self, key: &str, value: &str) -> String {
        format!("{} {}", self.key.apply_to(format!("{}:", key)), value)
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_success() {
        let msg = RagEnvTheme::plain().format_success("torch loaded");
        assert_eq!(msg, "✓ torch loaded");
    }

    #[test]
    fn theme_formats_warning() {
        let msg = RagEnvTheme::plain().format_warning("Not in a virtual environment");
        assert!(msg.starts_with("⚠"));
        assert!(msg.contains("Not in a virtual environment"));
    }

    #[test]
    fn theme_formats_error() {
        let msg = RagEnvTheme::plain().format_error("chromadb not found");
        assert_eq!(msg, "✗ chromadb not found");
    }

    #[test]
    fn theme_formats_header() {
        let msg = RagEnvTheme::plain().format_header("RAG Environment Debug");
        assert_eq!(msg, "=== RAG Environment Debug ===");
    }

    #[test]
    fn theme_formats_field() {
        let msg = RagEnvTheme::plain().format_field("Virtual env", "None");
        assert_eq!(msg, "Virtual env: None");
    }

    #[test]
    fn colored_theme_keeps_text() {
        let msg = RagEnvTheme::new().format_success("done");
        assert!(msg.contains("done"));
    }
}
