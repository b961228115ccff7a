//! Configuration loading entry points.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::PromptConfig;
use config::{ConfigError, File};
use std::path::Path;

/// Loads [`PromptConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, workspace files, then environment.
    pub fn load(workspace_root: &Path) -> Result<PromptConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Defaults overlaid by exactly one file; no other sources are read.
    pub fn load_from_file(path: &Path) -> Result<PromptConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only.
    pub fn default() -> PromptConfig {
        PromptConfig::default()
    }
}
