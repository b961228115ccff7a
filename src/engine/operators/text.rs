//! Text operators: literal, ignore, repeat.

use crate::engine::context::EvalContext;
use crate::error::PromptError;
use crate::template::escape::escape;

const REPEAT_SEPARATOR: &str = " ";

/// Verbatim body, escaped so the rescan after splicing leaves it alone.
///
/// The body is protected from evaluation only. Output cleanup runs later over
/// the whole text, so runs of whitespace and spaces before punctuation inside
/// a literal are still normalized unless cleanup is disabled.
pub fn literal(body: &str) -> String {
    escape(body)
}

pub fn ignore(ctx: &mut EvalContext<'_>, body: &str) -> Result<String, PromptError> {
    ctx.evaluate(body)?;
    Ok(String::new())
}

/// Evaluate the text `count` times, each independently, joined by a space.
pub fn repeat(ctx: &mut EvalContext<'_>, raw_count: &str, raw_text: &str) -> Result<String, PromptError> {
    let evaluated = ctx.evaluate(raw_count)?;
    let count: usize = evaluated
        .trim()
        .parse()
        .map_err(|_| PromptError::NumericParse {
            operator: "repeat".to_string(),
            value: evaluated.trim().to_string(),
        })?;
    let max = ctx.limits().max_repeat;
    if count > max {
        return Err(PromptError::RepeatLimit { count, max });
    }
    let parts = (0..count)
        .map(|_| ctx.evaluate(raw_text).map(|part| part.trim().to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(REPEAT_SEPARATOR))
}
