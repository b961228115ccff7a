//! Output cleanup and the template's postprocess rewrites.

use super::rewrite::{compile, RewriteRule, Rewrites};
use crate::error::PromptError;
use regex::Regex;

/// Compiled postprocessing pipeline for one template.
#[derive(Debug, Clone)]
pub struct Postprocessor {
    cleanup: Option<Cleanup>,
    rewrites: Rewrites,
}

#[derive(Debug, Clone)]
struct Cleanup {
    whitespace: Regex,
    before_punctuation: Regex,
    after_comma: Regex,
}

impl Cleanup {
    fn new() -> Result<Self, PromptError> {
        Ok(Self {
            whitespace: compile("cleanup", r"\s+", false)?,
            before_punctuation: compile("cleanup", r"\s+([.!?,;:])", false)?,
            after_comma: compile("cleanup", r",\s*", false)?,
        })
    }

    fn apply(&self, text: &str) -> String {
        let text = self.whitespace.replace_all(text, " ");
        let text = text.trim().replace(". .", ".").replace(", ,", ",");
        let text = self.before_punctuation.replace_all(&text, "$1");
        let text = self.after_comma.replace_all(&text, ", ");
        text.trim().to_string()
    }
}

impl Postprocessor {
    pub fn new(rules: &[RewriteRule], cleanup: bool) -> Result<Self, PromptError> {
        let cleanup = if cleanup { Some(Cleanup::new()?) } else { None };
        let rewrites = Rewrites::new("postprocess", rules)?;
        Ok(Self { cleanup, rewrites })
    }

    pub fn apply(&self, text: &str) -> String {
        match &self.cleanup {
            Some(cleanup) => self.rewrites.apply(&cleanup.apply(text)),
            None => self.rewrites.apply(text),
        }
    }
}
