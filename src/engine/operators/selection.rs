//! Randomizing and lookup operators.

use super::{plain, plain_list};
use crate::engine::context::EvalContext;
use crate::error::PromptError;
use tracing::debug;

const DEFAULT_CHANCE: f64 = 50.0;

/// Draw one raw option and evaluate only that one.
pub fn one_of(ctx: &mut EvalContext<'_>, options: &[&str]) -> Result<String, PromptError> {
    match ctx.choose_index(options.len()) {
        Some(index) => ctx.evaluate_arg(options.get(index)),
        None => Ok(String::new()),
    }
}

/// Resolve the key expression to a name, then resolve that name.
pub fn indirection(ctx: &mut EvalContext<'_>, raw: &str) -> Result<String, PromptError> {
    let key = ctx.key_name(raw)?;
    debug!(key = key.as_str(), "indirect lookup");
    ctx.select(&key)
}

/// `key|excluded|default`: a uniform draw among candidates not excluded.
///
/// `excluded` is evaluated; without a comma and naming a key, that key's
/// values are excluded, otherwise it is a comma list. Values are compared with
/// entities restored.
pub fn except(ctx: &mut EvalContext<'_>, args: &[&str]) -> Result<String, PromptError> {
    let key = ctx.key_name(args[0])?;
    let candidates = ctx
        .candidates(&key)
        .ok_or_else(|| PromptError::KeyNotFound(key.clone()))?;
    let excluded_text = ctx.evaluate_arg(args.get(1))?;

    let excluded: Vec<String> = match ctx.candidates(excluded_text.trim()) {
        Some(values) if !excluded_text.contains(',') => values.iter().map(|v| plain(v)).collect(),
        _ => plain_list(&excluded_text),
    };

    let remaining: Vec<String> = candidates
        .iter()
        .filter(|candidate| !excluded.contains(&plain(candidate)))
        .cloned()
        .collect();

    match ctx.choose(&remaining).cloned() {
        Some(chosen) => ctx.evaluate_entry(&key, &chosen),
        None => {
            debug!(key = key.as_str(), "all candidates excluded, using default");
            ctx.evaluate_arg(args.get(2))
        }
    }
}

/// The N-th candidate of a key, or the default when out of range.
pub fn index(ctx: &mut EvalContext<'_>, position: usize, args: &[&str]) -> Result<String, PromptError> {
    let key = ctx.key_name(args[0])?;
    let candidates = ctx
        .candidates(&key)
        .ok_or_else(|| PromptError::KeyNotFound(key.clone()))?;
    match candidates.get(position) {
        Some(chosen) => ctx.evaluate_entry(&key, chosen),
        None => ctx.evaluate_arg(args.get(1)),
    }
}

/// Evaluate the text with the given percent chance, else the empty string.
///
/// A draw is made in `[0, 100)` and compared with `<`, so 0 never and 100
/// always yields the text.
pub fn maybe(ctx: &mut EvalContext<'_>, chance: Option<f64>, args: &[&str]) -> Result<String, PromptError> {
    let (chance, text) = match (chance, args) {
        (Some(chance), [text]) => (chance, *text),
        (None, [text]) => (DEFAULT_CHANCE, *text),
        (_, [raw_chance, text]) => {
            let evaluated = ctx.evaluate(raw_chance)?;
            let chance = evaluated.trim().parse::<f64>().map_err(|_| PromptError::NumericParse {
                operator: "maybe".to_string(),
                value: evaluated.trim().to_string(),
            })?;
            (chance, *text)
        }
        _ => {
            return Err(PromptError::ArityMismatch {
                operator: "maybe".to_string(),
                expected: "1-2".to_string(),
                actual: args.len(),
            })
        }
    };
    let draw = ctx.draw_percent();
    debug!(chance, draw, "maybe draw");
    if draw < chance {
        ctx.evaluate_arg(Some(&text))
    } else {
        Ok(String::new())
    }
}
