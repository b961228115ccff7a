//! Prompt Generator
//!
//! Turns a [`Template`] into a batch of independent outputs. Every output gets
//! its own evaluation context seeded from the batch seed and its position, so
//! any single output can be reproduced with [`Generator::render`] alone.
//! Continuations chain within a prompt number, seeing the previous output and
//! its statics as `last_*` parameters.

use crate::engine::context::{EvalContext, EvalLimits, Namespace};
use crate::engine::locator::validate_braces;
use crate::error::PromptError;
use crate::template::escape::{escape, unescape};
use crate::template::{Postprocessor, Template, TAGS_PATH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub mod parameters;
pub mod preprocess;
pub mod seed;

pub use parameters::GenerationParameters;
pub use preprocess::Preprocessor;
pub use seed::{derive_output_seed, fresh_seed};

/// Generator limits and output cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_max_prompts")]
    pub max_prompts: usize,

    #[serde(default = "default_max_continues")]
    pub max_continues: usize,

    /// Largest count accepted by `repeat`.
    #[serde(default = "default_max_repeat")]
    pub max_repeat: usize,

    /// Deepest nesting of evaluations inside one output.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Whitespace and punctuation cleanup before template rewrites.
    #[serde(default = "default_cleanup")]
    pub cleanup: bool,
}

fn default_max_prompts() -> usize {
    1000
}

fn default_max_continues() -> usize {
    10
}

fn default_max_repeat() -> usize {
    EvalLimits::default().max_repeat
}

fn default_max_depth() -> usize {
    EvalLimits::default().max_depth
}

fn default_cleanup() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_prompts: default_max_prompts(),
            max_continues: default_max_continues(),
            max_repeat: default_max_repeat(),
            max_depth: default_max_depth(),
            cleanup: default_cleanup(),
        }
    }
}

impl GeneratorConfig {
    pub fn limits(&self) -> EvalLimits {
        EvalLimits {
            max_repeat: self.max_repeat,
            max_depth: self.max_depth,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_prompts == 0 {
            return Err("max_prompts must be at least 1".to_string());
        }
        if self.max_depth == 0 {
            return Err("max_depth must be at least 1".to_string());
        }
        Ok(())
    }
}

/// One generate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Base seed; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    /// Accepted for compatibility; enhancement is not performed.
    pub enhance: bool,
    pub parameters: BTreeMap<String, String>,
    pub num_prompts: usize,
    pub num_continues: usize,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            seed: None,
            enhance: false,
            parameters: BTreeMap::new(),
            num_prompts: 1,
            num_continues: 0,
        }
    }
}

impl GenerateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_prompts(mut self, num_prompts: usize) -> Self {
        self.num_prompts = num_prompts;
        self
    }

    pub fn with_continues(mut self, num_continues: usize) -> Self {
        self.num_continues = num_continues;
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_enhance(mut self, enhance: bool) -> Self {
        self.enhance = enhance;
        self
    }
}

/// Resolved text and per-output state of a single render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub output: String,
    pub tracked: BTreeMap<String, String>,
    pub statics: BTreeMap<String, String>,
}

/// One output of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPrompt {
    pub output: String,
    pub tracked: BTreeMap<String, String>,
    pub statics: BTreeMap<String, String>,
    pub seed: u64,
    pub prompt_number: usize,
    pub pass_number: usize,
    /// Generation parameters this output saw.
    pub parameters: BTreeMap<String, String>,
}

/// Outputs in batch order; a failed output keeps its slot.
#[derive(Debug)]
pub struct GenerationBatch {
    pub seed: u64,
    pub results: Vec<Result<GeneratedPrompt, PromptError>>,
}

impl GenerationBatch {
    pub fn outputs(&self) -> impl Iterator<Item = &GeneratedPrompt> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &PromptError)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(index, r)| r.as_ref().err().map(|e| (index, e)))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A validated template bound to generator settings.
#[derive(Debug)]
pub struct Generator<'t> {
    template: &'t Template,
    config: GeneratorConfig,
    preprocessor: Preprocessor,
    postprocessor: Postprocessor,
}

impl<'t> Generator<'t> {
    /// Validate the template and compile its rewrite rules and capture patterns.
    pub fn new(template: &'t Template, config: GeneratorConfig) -> Result<Self, PromptError> {
        template.validate()?;
        let preprocessor = Preprocessor::new(template)?;
        let postprocessor = Postprocessor::new(&template.postprocess, config.cleanup)?;
        Ok(Self {
            template,
            config,
            preprocessor,
            postprocessor,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a batch.
    ///
    /// Invalid caller parameters fail the whole call; evaluation failures are
    /// recorded in the failing output's slot.
    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerationBatch, PromptError> {
        let base_seed = request.seed.unwrap_or_else(fresh_seed);
        let parameters = GenerationParameters::new(&request.parameters)?;
        if request.enhance {
            debug!("prompt enhancement requested; not supported, ignoring");
        }

        let num_prompts = clamp("num_prompts", request.num_prompts, self.config.max_prompts);
        let num_continues = clamp(
            "num_continues",
            request.num_continues,
            self.config.max_continues,
        );

        let mut results = Vec::with_capacity(num_prompts * (num_continues + 1));
        for prompt_number in 0..num_prompts {
            let mut carried = BTreeMap::new();
            for pass_number in 0..=num_continues {
                let index = results.len();
                let seed = derive_output_seed(base_seed, index as u64);
                let visible = parameters.for_output(prompt_number, pass_number, &carried);
                let outcome = self.render(seed, &visible).map(|rendered| GeneratedPrompt {
                    output: rendered.output,
                    tracked: rendered.tracked,
                    statics: rendered.statics,
                    seed,
                    prompt_number,
                    pass_number,
                    parameters: visible,
                });
                match &outcome {
                    Ok(prompt) => {
                        carried = parameters::carry_forward(&prompt.output, &prompt.statics)
                    }
                    Err(error) => warn!(
                        index,
                        prompt_number,
                        pass_number,
                        error = %error,
                        "output failed"
                    ),
                }
                results.push(outcome);
            }
        }

        let batch = GenerationBatch {
            seed: base_seed,
            results,
        };
        info!(
            seed = base_seed,
            outputs = batch.len(),
            failed = batch.failures().count(),
            "generated batch"
        );
        Ok(batch)
    }

    /// Resolve one output from `seed` and unescaped `parameters`.
    ///
    /// The template's preprocess rules rewrite `text` and its regex captures
    /// become `meta_regex_*` values before anything is evaluated.
    pub fn render(
        &self,
        seed: u64,
        parameters: &BTreeMap<String, String>,
    ) -> Result<Rendered, PromptError> {
        let mut parameters = parameters.clone();
        let captures = self.preprocessor.apply(&mut parameters);
        let escaped = parameters
            .iter()
            .map(|(key, value)| (key.clone(), escape(value)))
            .collect();
        let namespace = captures.into_iter().fold(
            Namespace::new(self.template, escaped),
            |namespace, (key, values)| {
                namespace.with_values(key, values.iter().map(|v| escape(v)).collect())
            },
        );
        let mut ctx = EvalContext::new(&namespace, seed, self.config.limits());

        let tags_path = parameters.get(TAGS_PATH).map(String::as_str);
        let entrypoint = self.template.entrypoint.select(ctx.rng(), tags_path)?;
        let entrypoint = entrypoint.trim();
        if entrypoint.is_empty() {
            return Err(PromptError::InvalidTemplate(
                "entrypoint is empty".to_string(),
            ));
        }
        validate_braces(entrypoint)?;

        let resolved = ctx.evaluate(entrypoint)?;
        Ok(Rendered {
            output: unescape(&self.postprocessor.apply(&resolved)),
            tracked: unescape_values(ctx.tracked()),
            statics: unescape_values(ctx.statics()),
        })
    }
}

fn clamp(what: &str, requested: usize, max: usize) -> usize {
    if requested > max {
        warn!(what, requested, max, "request exceeds limit, clamping");
        max
    } else {
        requested
    }
}

fn unescape_values(values: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    values
        .iter()
        .map(|(key, value)| (key.clone(), unescape(value)))
        .collect()
}

/// Generate with default settings.
pub fn generate(
    template: &Template,
    request: &GenerateRequest,
) -> Result<GenerationBatch, PromptError> {
    Generator::new(template, GeneratorConfig::default())?.generate(request)
}
