//! Output formatting utilities

use anyhow::{Context, Result};
use colored::Colorize;
use jpql_diagnostics::JpqlError;
use serde::Serialize;
use std::fmt::Debug;
use std::io::IsTerminal;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Rust debug representation
    Debug,
    /// Compact JSON
    Json,
    /// Indented JSON
    #[default]
    Pretty,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stderr().is_terminal()),
    }
}

/// Render a built AST node
pub fn render<T: Serialize + Debug>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Debug => Ok(format!("{value:#?}")),
        OutputFormat::Json => serde_json::to_string(value).context("Failed to serialize JSON"),
        OutputFormat::Pretty => {
            serde_json::to_string_pretty(value).context("Failed to serialize JSON")
        }
    }
}

/// Format an error for display; build errors render as diagnostics
pub fn format_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<JpqlError>() {
        Some(err) => err.to_diagnostic().render(),
        None => format!("{} {:#}", "Error:".red().bold(), error),
    }
}

/// Format a note for display
pub fn format_note(note: &str) -> String {
    format!("{} {}", "Note:".cyan().bold(), note)
}
