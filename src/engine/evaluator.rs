//! Recursive evaluator
//!
//! Scans for the next top-level expression, hands its raw arguments to the
//! operator, splices the result back in place and rescans from the same
//! position. Operators decide which arguments are evaluated and when, which is
//! what gives conditionals their short-circuiting and stateful operators their
//! single firing.

use crate::engine::context::EvalContext;
use crate::engine::locator::next_expression;
use crate::engine::operators;
use crate::engine::registry;
use crate::engine::splitter::{split_expression, Invocation};
use crate::error::PromptError;
use tracing::{debug, trace};

impl<'t> EvalContext<'t> {
    /// Resolve every expression in `text`.
    pub fn evaluate(&mut self, text: &str) -> Result<String, PromptError> {
        self.descend()?;
        let result = self.evaluate_text(text);
        self.ascend();
        result
    }

    fn evaluate_text(&mut self, text: &str) -> Result<String, PromptError> {
        let mut output = text.to_string();
        let mut cursor = 0;
        while let Some(span) = next_expression(&output, cursor)? {
            let expression = output[span.clone()].to_string();
            let resolved = self
                .resolve_expression(&expression)
                .map_err(|e| e.at(&expression))?;
            output.replace_range(span.clone(), &resolved);
            cursor = span.start;
        }
        Ok(output)
    }

    fn resolve_expression(&mut self, expression: &str) -> Result<String, PromptError> {
        let invocation = split_expression(expression);
        let resolved = match invocation.name {
            None => self.resolve_implicit(&invocation)?,
            Some(token) => {
                let call = registry::resolve(token)?;
                let arity = call.operator.arity();
                if !call.operator.takes_raw_body() && !arity.accepts(invocation.args.len()) {
                    return Err(PromptError::ArityMismatch {
                        operator: token.to_string(),
                        expected: arity.describe(),
                        actual: invocation.args.len(),
                    });
                }
                trace!(operator = call.operator.name(), token, "dispatching operator");
                operators::dispatch(self, &call, &invocation)?
            }
        };
        Ok(resolved.trim().to_string())
    }

    fn resolve_implicit(&mut self, invocation: &Invocation<'_>) -> Result<String, PromptError> {
        if invocation.args.len() > 1 {
            return operators::selection::one_of(self, &invocation.args);
        }
        let key = self.key_name(invocation.body)?;
        self.select(&key)
    }

    /// A key name argument; nested expressions are resolved to build the name.
    pub(crate) fn key_name(&mut self, raw: &str) -> Result<String, PromptError> {
        let raw = raw.trim();
        if raw.contains('{') {
            Ok(self.evaluate(raw)?.trim().to_string())
        } else {
            Ok(raw.to_string())
        }
    }

    /// The value a key argument stands for.
    ///
    /// An argument holding an expression is evaluated and used as the value
    /// itself; a bare name is looked up and drawn from the namespace.
    pub(crate) fn resolve_value(&mut self, raw: &str) -> Result<String, PromptError> {
        let raw = raw.trim();
        if raw.contains('{') {
            Ok(self.evaluate(raw)?.trim().to_string())
        } else {
            self.select(raw)
        }
    }

    /// Draw one candidate of `key` and evaluate it.
    pub(crate) fn select(&mut self, key: &str) -> Result<String, PromptError> {
        let candidates = self
            .candidates(key)
            .ok_or_else(|| PromptError::KeyNotFound(key.to_string()))?;
        let chosen = self
            .choose(&candidates)
            .cloned()
            .ok_or_else(|| PromptError::EmptyCandidates(key.to_string()))?;
        debug!(key, candidates = candidates.len(), "selected value");
        self.evaluate_entry(key, &chosen)
    }

    /// Evaluate text that came from `key`, guarding against self-reference.
    pub(crate) fn evaluate_entry(&mut self, key: &str, text: &str) -> Result<String, PromptError> {
        self.begin_resolving(key)?;
        let result = self.evaluate(text);
        self.end_resolving();
        Ok(result?.trim().to_string())
    }

    /// Evaluate an optional argument; a missing one is the empty string.
    pub(crate) fn evaluate_arg(&mut self, raw: Option<&&str>) -> Result<String, PromptError> {
        match raw {
            Some(raw) => Ok(self.evaluate(raw)?.trim().to_string()),
            None => Ok(String::new()),
        }
    }
}
