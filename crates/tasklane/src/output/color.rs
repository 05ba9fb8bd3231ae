//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Critical path: red bold (members, marker)
//!   - Success:       green    (completed actions)
//!   - Warning:       yellow   (due dates, load warnings)
//!   - Reference:     cyan     (task ids)
//!   - Muted:         dimmed   (field labels, level badges)

use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Colorize a task id (cyan).
pub(crate) fn colorize_id(id: impl std::fmt::Display, config: &OutputConfig) -> String {
    let text = format!("#{id}");
    if !config.use_colors {
        return text;
    }
    text.cyan().to_string()
}

/// Level badge, e.g. `L2`; `L?` for tasks the analysis skipped.
pub(crate) fn level_badge(level: Option<usize>, config: &OutputConfig) -> String {
    let text = level.map_or_else(|| "L?".to_string(), |level| format!("L{level}"));
    dimmed(&text, config)
}

/// Marker shown in front of critical path members.
pub(crate) fn critical_marker(critical: bool, config: &OutputConfig) -> String {
    if !critical {
        return " ".to_string();
    }
    let icon = if config.use_ascii { "*" } else { "★" };
    if !config.use_colors {
        return icon.to_string();
    }
    icon.red().bold().to_string()
}

/// Title, highlighted when the task is critical.
pub(crate) fn colorize_title(title: &str, critical: bool, config: &OutputConfig) -> String {
    if !critical || !config.use_colors {
        return title.to_string();
    }
    title.red().bold().to_string()
}

/// Apply bold styling to text.
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Apply dimmed styling to text.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}
