//! Merge rules: defaults, override order.

use crate::config::PromptConfig;
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = PromptConfig::default();
    let generator = &defaults.generator;
    let logging = &defaults.logging;
    Config::builder()
        .set_default("generator.max_prompts", generator.max_prompts as u64)?
        .set_default("generator.max_continues", generator.max_continues as u64)?
        .set_default("generator.max_repeat", generator.max_repeat as u64)?
        .set_default("generator.max_depth", generator.max_depth as u64)?
        .set_default("generator.cleanup", generator.cleanup)?
        .set_default("logging.level", logging.level.as_str())?
        .set_default("logging.format", logging.format.as_str())?
        .set_default("logging.output", logging.output.as_str())
}
