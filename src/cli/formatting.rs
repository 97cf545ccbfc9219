//! Formatting utilities for CLI output.

use chrono::Local;

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats the line printed before each rendering of a watched config.
///
/// The initial bind is labelled `loaded`, reloads after a file change
/// `changed`, both prefixed with the local wall-clock time.
pub fn format_change_header(changed: bool) -> String {
    let (label, color) = if changed {
        ("changed", Colors::GREEN)
    } else {
        ("loaded", Colors::CYAN)
    };

    format!(
        "{}[{}]{} {}{}{}{}",
        Colors::DIM,
        Local::now().format("%H:%M:%S"),
        Colors::RESET,
        Colors::BOLD,
        color,
        label,
        Colors::RESET
    )
}
