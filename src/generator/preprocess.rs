//! Rewriting of the caller's `text` parameter and regex captures from it.

use crate::error::PromptError;
use crate::template::rewrite::compile;
use crate::template::{Rewrites, Template};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use tracing::debug;

/// Parameter the template's preprocess rules and regex captures read.
pub const TEXT: &str = "text";

/// Captured values are visible as `meta_regex_<field>`.
pub const CAPTURE_PREFIX: &str = "meta_regex_";

/// Compiled preprocess rules and capture patterns of one template.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    rewrites: Rewrites,
    captures: Vec<(String, Regex)>,
}

impl Preprocessor {
    pub fn new(template: &Template) -> Result<Self, PromptError> {
        let rewrites = Rewrites::new("preprocess", &template.preprocess)?;
        let captures = template
            .regex
            .iter()
            .map(|(field, pattern)| {
                let regex = compile("regex", &format!("^(?:{})", pattern), false)?;
                Ok((field.clone(), regex))
            })
            .collect::<Result<Vec<_>, PromptError>>()?;
        Ok(Self { rewrites, captures })
    }

    /// Rewrite `text` in place, then capture from it.
    ///
    /// Each field yields its groups: one value for a single group, one
    /// candidate per group otherwise, the whole match when the pattern has no
    /// group. A missing `text` or a failed match yields the empty string.
    pub fn apply(&self, parameters: &mut BTreeMap<String, String>) -> BTreeMap<String, Vec<String>> {
        if let Some(text) = parameters.get_mut(TEXT) {
            if !self.rewrites.is_empty() {
                *text = self.rewrites.apply(text);
                debug!("rewrote text parameter");
            }
        }

        let text = parameters.get(TEXT);
        self.captures
            .iter()
            .map(|(field, regex)| {
                let values = text
                    .and_then(|text| regex.captures(text))
                    .map(|captures| groups(&captures))
                    .unwrap_or_else(|| vec![String::new()]);
                debug!(field = field.as_str(), groups = values.len(), "regex capture");
                (format!("{}{}", CAPTURE_PREFIX, field), values)
            })
            .collect()
    }
}

fn groups(captures: &Captures<'_>) -> Vec<String> {
    let groups: Vec<String> = captures
        .iter()
        .skip(1)
        .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
        .collect();
    if groups.is_empty() {
        vec![captures[0].to_string()]
    } else {
        groups
    }
}
