//! Template validation formatters.

use crate::error::ApiError;
use crate::template::Template;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Counts reported for a template that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub path: PathBuf,
    pub data_keys: usize,
    pub list_keys: usize,
    pub logic_keys: usize,
    pub preprocess_rules: usize,
    pub regex_fields: usize,
    pub postprocess_rules: usize,
}

impl TemplateSummary {
    pub fn new(path: &Path, template: &Template) -> Self {
        Self {
            path: path.to_path_buf(),
            data_keys: template.data.len(),
            list_keys: template.data.values().filter(|v| v.is_list()).count(),
            logic_keys: template.logic.len(),
            preprocess_rules: template.preprocess.len(),
            regex_fields: template.regex.len(),
            postprocess_rules: template.postprocess.len(),
        }
    }
}

pub fn format_validation_text(summary: &TemplateSummary) -> String {
    format!(
        "Template is valid: {}\n  Data keys: {} ({} lists)\n  Logic keys: {}\n  Preprocess rules: {} ({} regex fields)\n  Postprocess rules: {}",
        summary.path.display(),
        summary.data_keys,
        summary.list_keys,
        summary.logic_keys,
        summary.preprocess_rules,
        summary.regex_fields,
        summary.postprocess_rules
    )
}

pub fn format_validation_json(summary: &TemplateSummary) -> Result<String, ApiError> {
    let mut value = serde_json::to_value(summary)?;
    value["valid"] = serde_json::Value::Bool(true);
    Ok(serde_json::to_string_pretty(&value)?)
}
