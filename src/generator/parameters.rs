//! Caller parameters and the values the generator injects per output.

use crate::error::PromptError;
use crate::template::check_reserved;
use std::collections::BTreeMap;

/// Caller key whose newline-separated value rotates through prompts.
pub const FOLLOW_LIST_PREFIX: &str = "follow-list-of-";

pub const PASS_NUMBER: &str = "pass_number";
pub const LAST_OUTPUT: &str = "last_output";
const LAST_PREFIX: &str = "last_";

/// Callers may not pass keys reachable as `meta_regex_*` captures.
pub const REGEX_PREFIX: &str = "regex_";
const CURRENT_PREFIX: &str = "current_";

/// Validated caller parameters for one generate call.
#[derive(Debug, Clone, Default)]
pub struct GenerationParameters {
    base: BTreeMap<String, String>,
    follow_lists: Vec<(String, Vec<String>)>,
}

impl GenerationParameters {
    pub fn new(parameters: &BTreeMap<String, String>) -> Result<Self, PromptError> {
        let mut base = BTreeMap::new();
        let mut follow_lists = Vec::new();
        for (key, value) in parameters {
            check_reserved(key)?;
            if key.starts_with(REGEX_PREFIX) {
                return Err(PromptError::ReservedKey {
                    key: key.clone(),
                    prefix: REGEX_PREFIX,
                });
            }
            match key.strip_prefix(FOLLOW_LIST_PREFIX) {
                Some(name) => {
                    let values: Vec<String> = value
                        .lines()
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(str::to_string)
                        .collect();
                    if !values.is_empty() {
                        follow_lists.push((name.to_string(), values));
                    }
                }
                None => {
                    base.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(Self { base, follow_lists })
    }

    /// Parameters visible to one output. Injected values override caller values.
    pub fn for_output(
        &self,
        prompt_number: usize,
        pass_number: usize,
        carried: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let mut visible = self.base.clone();
        for (name, values) in &self.follow_lists {
            let value = &values[prompt_number % values.len()];
            visible.insert(format!("{}{}", CURRENT_PREFIX, name), value.clone());
        }
        visible.insert(PASS_NUMBER.to_string(), pass_number.to_string());
        visible.extend(carried.iter().map(|(k, v)| (k.clone(), v.clone())));
        visible
    }
}

/// Context a continuation inherits from the previous output of its chain.
pub fn carry_forward(output: &str, statics: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut carried: BTreeMap<String, String> = statics
        .iter()
        .filter(|(key, _)| !key.starts_with(LAST_PREFIX))
        .map(|(key, value)| (format!("{}{}", LAST_PREFIX, key), value.clone()))
        .collect();
    carried.insert(LAST_OUTPUT.to_string(), output.to_string());
    carried
}
