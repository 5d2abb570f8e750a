//! Terminal output helpers shared by the subcommands.

use std::fmt::Display;
use std::io::{self, Write};

const RULE_WIDTH: usize = 56;

/// Print a section header and separator.
pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(RULE_WIDTH));
}

/// Print a key/value line.
pub fn key_value(label: &str, value: impl Display) {
    println!("  {label:<18} {value}");
}

pub fn ok(message: &str) {
    println!("✓ {message}");
}

pub fn warn(message: &str) {
    println!("⚠ {message}");
}

/// Errors go to stderr.
pub fn error(message: &str) {
    eprintln!("✗ {message}");
}

/// Print a multi-line block as is.
pub fn block(text: &str) {
    println!("{text}");
}

/// Start a progress line in the format `Label... `.
pub fn progress(label: &str) {
    print!("{label}... ");
    let _ = io::stdout().flush();
}

pub fn progress_done(success: bool) {
    println!("{}", if success { "ok" } else { "failed" });
}

/// Print `label: path`.
pub fn note_path(label: &str, path: &std::path::Path) {
    println!("{label}: {}", path.display());
}
