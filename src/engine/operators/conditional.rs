//! Branching operators: only the selected branch is ever evaluated.

use super::{plain, plain_list};
use crate::engine::context::EvalContext;
use crate::error::PromptError;
use crate::template::escape::escape;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparison {
    fn holds(self, left: f64, right: f64) -> bool {
        match self {
            Comparison::Greater => left > right,
            Comparison::Less => left < right,
            Comparison::GreaterOrEqual => left >= right,
            Comparison::LessOrEqual => left <= right,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
        }
    }
}

/// Evaluate `args[2]` when `condition` holds, otherwise `args[3]`.
fn branch(ctx: &mut EvalContext<'_>, args: &[&str], condition: bool) -> Result<String, PromptError> {
    debug!(condition, "taking branch");
    let index = if condition { 2 } else { 3 };
    ctx.evaluate_arg(args.get(index))
}

pub fn equals(ctx: &mut EvalContext<'_>, args: &[&str], negate: bool) -> Result<String, PromptError> {
    let value = plain(&ctx.resolve_value(args[0])?);
    let expected = plain(&ctx.evaluate_arg(args.get(1))?);
    branch(ctx, args, (value == expected) != negate)
}

pub fn compare(
    ctx: &mut EvalContext<'_>,
    comparison: Comparison,
    args: &[&str],
) -> Result<String, PromptError> {
    let left = plain(&ctx.resolve_value(args[0])?);
    let right = plain(&ctx.evaluate_arg(args.get(1))?);
    let left = parse_number(comparison.symbol(), &left)?;
    let right = parse_number(comparison.symbol(), &right)?;
    branch(ctx, args, comparison.holds(left, right))
}

fn parse_number(operator: &str, value: &str) -> Result<f64, PromptError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| !n.is_nan())
        .ok_or_else(|| PromptError::NumericParse {
            operator: operator.to_string(),
            value: value.to_string(),
        })
}

pub fn membership(
    ctx: &mut EvalContext<'_>,
    args: &[&str],
    negate: bool,
) -> Result<String, PromptError> {
    let value = plain(&ctx.resolve_value(args[0])?);
    let list = ctx.evaluate_arg(args.get(1))?;
    let found = plain_list(&list).contains(&value);
    branch(ctx, args, found != negate)
}

pub fn contains_all(
    ctx: &mut EvalContext<'_>,
    args: &[&str],
    negate: bool,
) -> Result<String, PromptError> {
    let value = plain(&ctx.resolve_value(args[0])?);
    let list = ctx.evaluate_arg(args.get(1))?;
    let has_all = plain_list(&list).iter().all(|part| value.contains(part.as_str()));
    branch(ctx, args, has_all != negate)
}

pub fn error(ctx: &mut EvalContext<'_>, args: &[&str]) -> Result<String, PromptError> {
    let value = plain(&ctx.resolve_value(args[0])?);
    let expected = plain(&ctx.evaluate_arg(args.get(1))?);
    if value == expected {
        return Err(PromptError::UserTriggered {
            key: args[0].trim().to_string(),
            value,
        });
    }
    Ok(String::new())
}

/// `key|prefix|default|a,b,...`: the entry `prefix + match`, or that text when
/// no such entry exists; `default` when nothing matches.
pub fn case(ctx: &mut EvalContext<'_>, args: &[&str]) -> Result<String, PromptError> {
    let value = plain(&ctx.resolve_value(args[0])?);
    let prefix = plain(&ctx.evaluate_arg(args.get(1))?);
    let candidates = ctx.evaluate_arg(args.get(3))?;
    let matched = plain_list(&candidates)
        .into_iter()
        .find(|candidate| *candidate == value);

    match matched {
        Some(candidate) => {
            let key = format!("{}{}", prefix, candidate);
            if ctx.candidates(&key).is_some() {
                ctx.select(&key)
            } else {
                Ok(escape(&key))
            }
        }
        None => ctx.evaluate_arg(args.get(2)),
    }
}

/// First non-empty value among the key arguments, else the evaluated default.
pub fn coalesce(ctx: &mut EvalContext<'_>, args: &[&str]) -> Result<String, PromptError> {
    let Some((default, keys)) = args.split_last() else {
        return Ok(String::new());
    };
    for raw in keys {
        let raw = raw.trim();
        let value = if raw.contains('{') {
            ctx.evaluate(raw)?.trim().to_string()
        } else if ctx.candidates(raw).is_some() {
            ctx.select(raw)?
        } else {
            String::new()
        };
        if !value.is_empty() {
            return Ok(value);
        }
    }
    ctx.evaluate_arg(Some(default))
}

/// The key's value when it exists and holds non-empty text, else the default.
pub fn optional(ctx: &mut EvalContext<'_>, args: &[&str]) -> Result<String, PromptError> {
    let key = ctx.key_name(args[0])?;
    let present = ctx
        .candidates(&key)
        .map_or(false, |values| values.iter().any(|v| !v.trim().is_empty()));
    if present {
        ctx.select(&key)
    } else {
        ctx.evaluate_arg(args.get(1))
    }
}
