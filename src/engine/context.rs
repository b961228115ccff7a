//! Evaluation context
//!
//! One [`EvalContext`] exists per generated output. It carries the read-only
//! [`Namespace`] plus all per-output mutable state: static cache, exclusive
//! used-sets, tracked texts, the seeded random source, and the chain of keys
//! currently being resolved.

use crate::error::PromptError;
use crate::template::Template;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

const TRACK_PREFIX: &str = "track_";
const META_PREFIX: &str = "meta_";

/// Read-only lookup view over template data, logic and parameters.
///
/// Lookup order: parameters by bare name, `meta_<name>` parameters, template
/// data, template logic. Parameters override template data on collision.
#[derive(Debug)]
pub struct Namespace<'t> {
    template: &'t Template,
    parameters: BTreeMap<String, Vec<String>>,
}

impl<'t> Namespace<'t> {
    /// `parameters` must already be escaped.
    pub fn new(template: &'t Template, parameters: BTreeMap<String, String>) -> Self {
        let parameters = parameters
            .into_iter()
            .map(|(key, value)| (key, vec![value]))
            .collect();
        Self {
            template,
            parameters,
        }
    }

    /// Add a multi-valued entry ahead of template data. Values must already be escaped.
    pub fn with_values(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.parameters.insert(key.into(), values);
        self
    }

    pub fn template(&self) -> &'t Template {
        self.template
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        if let Some(value) = self.parameters.get(key) {
            return Some(value);
        }
        if let Some(value) = key
            .strip_prefix(META_PREFIX)
            .and_then(|bare| self.parameters.get(bare))
        {
            return Some(value);
        }
        if let Some(value) = self.template.data.get(key) {
            return Some(value.candidates());
        }
        self.template
            .logic
            .get(key)
            .map(std::slice::from_ref)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Bounds on a single output's evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalLimits {
    pub max_repeat: usize,
    pub max_depth: usize,
}

impl Default for EvalLimits {
    fn default() -> Self {
        Self {
            max_repeat: 256,
            max_depth: 64,
        }
    }
}

/// Per-output evaluation state.
pub struct EvalContext<'t> {
    namespace: &'t Namespace<'t>,
    limits: EvalLimits,
    rng: StdRng,
    static_cache: BTreeMap<String, String>,
    used_values: HashMap<String, HashSet<String>>,
    tracked: BTreeMap<String, String>,
    resolving: Vec<String>,
    depth: usize,
}

impl<'t> EvalContext<'t> {
    pub fn new(namespace: &'t Namespace<'t>, seed: u64, limits: EvalLimits) -> Self {
        Self {
            namespace,
            limits,
            rng: StdRng::seed_from_u64(seed),
            static_cache: BTreeMap::new(),
            used_values: HashMap::new(),
            tracked: BTreeMap::new(),
            resolving: Vec::new(),
            depth: 0,
        }
    }

    pub fn namespace(&self) -> &'t Namespace<'t> {
        self.namespace
    }

    pub fn limits(&self) -> EvalLimits {
        self.limits
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Candidates for `key`, including `track_<name>` values recorded so far.
    pub fn candidates(&self, key: &str) -> Option<Cow<'t, [String]>> {
        if let Some(value) = key
            .strip_prefix(TRACK_PREFIX)
            .and_then(|name| self.tracked.get(name))
        {
            return Some(Cow::Owned(vec![value.clone()]));
        }
        self.namespace.get(key).map(Cow::Borrowed)
    }

    /// Uniform draw over `options`. A single option consumes no randomness.
    pub fn choose<'a>(&mut self, options: &'a [String]) -> Option<&'a String> {
        match options {
            [only] => Some(only),
            _ => options.choose(&mut self.rng),
        }
    }

    /// Uniform index in `0..len`.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        match len {
            0 => None,
            1 => Some(0),
            _ => Some(self.rng.gen_range(0..len)),
        }
    }

    /// Uniform percentage draw in `[0, 100)`.
    pub fn draw_percent(&mut self) -> f64 {
        self.rng.gen_range(0.0..100.0)
    }

    pub fn cached_static(&self, key: &str) -> Option<&String> {
        self.static_cache.get(key)
    }

    /// Fix a static value. The first value for a key wins for the whole output.
    pub fn fix_static(&mut self, key: String, value: String) -> &String {
        self.static_cache.entry(key).or_insert(value)
    }

    pub fn used_values(&self, key: &str) -> Option<&HashSet<String>> {
        self.used_values.get(key)
    }

    pub fn mark_used(&mut self, key: &str, value: &str) {
        self.used_values
            .entry(key.to_string())
            .or_default()
            .insert(value.to_string());
    }

    /// Record tracked text; the last write for a name wins.
    pub fn track(&mut self, name: String, text: String) {
        self.tracked.insert(name, text);
    }

    pub fn tracked(&self) -> &BTreeMap<String, String> {
        &self.tracked
    }

    pub fn statics(&self) -> &BTreeMap<String, String> {
        &self.static_cache
    }

    /// Push `key` onto the resolution chain, failing if it is already being resolved.
    pub fn begin_resolving(&mut self, key: &str) -> Result<(), PromptError> {
        if self.resolving.iter().any(|k| k == key) {
            let mut chain = self.resolving.clone();
            chain.push(key.to_string());
            return Err(PromptError::IndirectionCycle {
                chain: chain.join(" -> "),
            });
        }
        self.resolving.push(key.to_string());
        Ok(())
    }

    pub fn end_resolving(&mut self) {
        self.resolving.pop();
    }

    pub fn descend(&mut self) -> Result<(), PromptError> {
        if self.depth >= self.limits.max_depth {
            return Err(PromptError::RecursionLimit(self.limits.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
