//! CLI route: single route table and run context. Dispatches to the generator and presentation.

use crate::cli::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_batch_json, format_batch_text, format_operators_json, format_operators_text,
    format_validation_json, format_validation_text, TemplateSummary,
};
use crate::config::{ConfigLoader, PromptConfig};
use crate::error::ApiError;
use crate::generator::{GenerateRequest, Generator};
use crate::template::Template;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

/// Runtime context for CLI execution: workspace root and resolved configuration.
#[derive(Debug, Clone)]
pub struct RunContext {
    workspace_root: PathBuf,
    config: PromptConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(workspace_root, config)
    }

    /// Create run context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: PromptConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn config(&self) -> &PromptConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let span = info_span!("command", name = command_name(command));
        let _entered = span.enter();
        match command {
            Commands::Generate {
                template,
                seed,
                count,
                continues,
                params,
                enhance,
                format,
            } => {
                let request = GenerateRequest {
                    seed: *seed,
                    enhance: *enhance,
                    parameters: params.iter().cloned().collect(),
                    num_prompts: *count,
                    num_continues: *continues,
                };
                self.handle_generate(template, &request, format)
            }
            Commands::Validate { template, format } => self.handle_validate(template, format),
            Commands::Operators { format } => match parse_format(format)? {
                OutputFormat::Json => format_operators_json(),
                OutputFormat::Text => Ok(format_operators_text()),
            },
        }
    }

    fn handle_generate(
        &self,
        template_path: &Path,
        request: &GenerateRequest,
        format: &str,
    ) -> Result<String, ApiError> {
        let format = parse_format(format)?;
        let template = self.load_template(template_path)?;
        let generator = Generator::new(&template, self.config.generator.clone())?;
        let batch = generator.generate(request)?;
        match format {
            OutputFormat::Json => format_batch_json(&batch),
            OutputFormat::Text => Ok(format_batch_text(&batch)),
        }
    }

    fn handle_validate(&self, template_path: &Path, format: &str) -> Result<String, ApiError> {
        let format = parse_format(format)?;
        let template = self.load_template(template_path)?;
        Generator::new(&template, self.config.generator.clone())?;
        let summary = TemplateSummary::new(template_path, &template);
        match format {
            OutputFormat::Json => format_validation_json(&summary),
            OutputFormat::Text => Ok(format_validation_text(&summary)),
        }
    }

    /// Relative template paths are resolved against the workspace root.
    fn load_template(&self, path: &Path) -> Result<Template, ApiError> {
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        };
        debug!(path = %resolved.display(), "loading template");
        Template::load(&resolved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_format(format: &str) -> Result<OutputFormat, ApiError> {
    match format {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(ApiError::InvalidArgument(format!(
            "unknown format '{}' (expected 'text' or 'json')",
            other
        ))),
    }
}
