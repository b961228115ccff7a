//! CLI parse: clap types for infiniprompt. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Infiniprompt CLI - template-driven prompt generation
#[derive(Parser, Debug)]
#[command(name = "infiniprompt")]
#[command(about = "Generate prompts from templates with an embedded operator language")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides layered config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generate prompts from a template file
    Generate {
        /// Template JSON file
        template: PathBuf,
        /// Base seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Number of prompts
        #[arg(long, default_value = "1")]
        count: usize,
        /// Continuations per prompt
        #[arg(long, default_value = "0")]
        continues: usize,
        /// Extra parameter as KEY=VALUE (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Request prompt enhancement (accepted, not performed)
        #[arg(long)]
        enhance: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate a template file without generating
    Validate {
        /// Template JSON file
        template: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List operators and their aliases
    Operators {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Parse a `KEY=VALUE` parameter; the value may itself contain `=`.
pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
