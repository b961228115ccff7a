//! Case-insensitive regex rewrites shared by preprocessing and postprocessing.

use crate::error::PromptError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A case-insensitive rewrite. `{N}` in the replacement refers to capture group N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Compiled rewrites, applied in order.
#[derive(Debug, Clone, Default)]
pub struct Rewrites {
    rules: Vec<(Regex, String)>,
}

impl Rewrites {
    /// `stage` names the template section in compile errors.
    pub fn new(stage: &str, rules: &[RewriteRule]) -> Result<Self, PromptError> {
        let rules = rules
            .iter()
            .map(|rule| {
                let regex = compile(stage, &rule.pattern, true)?;
                Ok((regex, translate_replacement(&rule.replacement)))
            })
            .collect::<Result<Vec<_>, PromptError>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        let mut output = text.to_string();
        for (regex, replacement) in &self.rules {
            output = regex.replace_all(&output, replacement.as_str()).into_owned();
        }
        output
    }
}

pub(crate) fn compile(stage: &str, pattern: &str, case_insensitive: bool) -> Result<Regex, PromptError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| {
            PromptError::InvalidTemplate(format!("invalid {} pattern '{}': {}", stage, pattern, e))
        })
}

/// Convert `{N}` group references to the regex crate's `${N}` syntax.
fn translate_replacement(replacement: &str) -> String {
    let mut translated = String::with_capacity(replacement.len());
    let mut rest = replacement;
    while let Some(ch) = rest.chars().next() {
        if ch == '$' {
            translated.push_str("$$");
            rest = &rest[1..];
            continue;
        }
        if ch == '{' {
            if let Some(close) = rest.find('}') {
                let group = &rest[1..close];
                if !group.is_empty() && group.chars().all(|c| c.is_ascii_digit()) {
                    translated.push_str("${");
                    translated.push_str(group);
                    translated.push('}');
                    rest = &rest[close + 1..];
                    continue;
                }
            }
        }
        translated.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    translated
}
