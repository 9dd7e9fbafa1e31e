//! Status vocabulary shared by every command.

use crate::verify::DependencyStatus;

use super::theme::RagEnvTheme;

/// Canonical status kinds used across ragenv output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Present / passed.
    Success,
    /// Missing / failed.
    Failed,
    /// Non-fatal problem.
    Warning,
    /// Currently being checked.
    Running,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Failed => "✗",
            Self::Warning => "⚠",
            Self::Running => "◆",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Failed => "[FAIL]",
            Self::Warning => "[warn]",
            Self::Running => "[run]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &RagEnvTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
            Self::Running => theme.info.apply_to(icon).to_string(),
        }
    }

    /// Format a status line: styled icon + message.
    pub fn format(self, theme: &RagEnvTheme, msg: &str) -> String {
        format!("{} {}", self.styled(theme), msg)
    }

    /// Format a status line for non-TTY: bracketed + message.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}

impl From<&DependencyStatus> for StatusKind {
    fn from(status: &DependencyStatus) -> Self {
        match status {
            DependencyStatus::Found(_) => Self::Success,
            DependencyStatus::NotFound => Self::Failed,
            DependencyStatus::Broken { .. } | DependencyStatus::TimedOut { .. } => Self::Warning,
        }
    }
}

impl From<bool> for StatusKind {
    fn from(ok: bool) -> Self {
        if ok {
            Self::Success
        } else {
            Self::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::DependencyMetadata;
    use std::time::Duration;

    #[test]
    fn icons_and_brackets() {
        assert_eq!(StatusKind::Success.icon(), "✓");
        assert_eq!(StatusKind::Failed.bracketed(), "[FAIL]");
        assert_eq!(StatusKind::Warning.format_plain("slow"), "[warn] slow");
    }

    #[test]
    fn dependency_status_maps_to_kind() {
        let found = DependencyStatus::Found(DependencyMetadata::default());
        assert_eq!(StatusKind::from(&found), StatusKind::Success);
        assert_eq!(
            StatusKind::from(&DependencyStatus::NotFound),
            StatusKind::Failed
        );
        let timed_out = DependencyStatus::TimedOut {
            after: Duration::from_secs(1),
        };
        assert_eq!(StatusKind::from(&timed_out), StatusKind::Warning);
    }

    #[test]
    fn plain_theme_styles_are_bare_icons() {
        let theme = RagEnvTheme::plain();
        assert_eq!(StatusKind::from(true).styled(&theme), "✓");
        assert_eq!(StatusKind::from(false).format(&theme, "missing"), "✗ missing");
    }
}
