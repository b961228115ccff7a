//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, PromptError};
use owo_colors::OwoColorize;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Prompt(prompt) => format!("{} {}", "error:".red().bold(), describe(prompt)),
        other => format!("{} {}", "error:".red().bold(), other),
    }
}

/// One-line description of a prompt error, naming the failing expression.
pub(crate) fn describe(e: &PromptError) -> String {
    match e.expression() {
        Some(expression) => format!("{} in {}", e.root_cause(), expression),
        None => e.to_string(),
    }
}
