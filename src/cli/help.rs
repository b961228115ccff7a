//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name recorded on the command span (e.g. "generate").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Generate { .. } => "generate",
        Commands::Validate { .. } => "validate",
        Commands::Operators { .. } => "operators",
    }
}
