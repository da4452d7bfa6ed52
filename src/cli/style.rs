//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escapes when the
//! terminal does not support color.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark
pub const CHECK: &str = "✓";

/// Cross mark
pub const CROSS: &str = "✗";

/// Semantic color helpers
pub trait Stylize: Display + Sized {
    /// De-emphasized text
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    /// Headings and labels
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    /// Values worth noticing
    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    /// Good news
    fn success(&self) -> String {
        self.green().to_string()
    }

    /// Bad news
    fn warn(&self) -> String {
        self.yellow().to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Yellow cross mark
pub fn cross() -> String {
    CROSS.warn()
}

/// Style for the per-PR progress bar
pub fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {msg} [{bar:30}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}
