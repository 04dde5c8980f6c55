//! Styled terminal lines for the human-facing channel.
//!
//! Report and capability JSON go to stdout unstyled; these helpers
//! cover the status lines that land on the terminal.

use console::style;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
