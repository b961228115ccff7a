//! Operators that read or write per-output state.

use crate::engine::context::EvalContext;
use crate::error::PromptError;
use tracing::debug;

const STATIC_SCOPE_MARK: char = '$';
const EXCLUSIVE_SCOPE_MARK: char = '@';

/// State key for `key` under `scope`; unscoped keys are used as is.
fn scoped_key(scope: &str, mark: char, key: &str) -> String {
    if scope.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", scope, mark, key)
    }
}

/// First reference draws and caches; later references reuse the cached value.
pub fn static_value(ctx: &mut EvalContext<'_>, scope: &str, raw_key: &str) -> Result<String, PromptError> {
    let key = ctx.key_name(raw_key)?;
    let cache_key = scoped_key(scope, STATIC_SCOPE_MARK, &key);
    if let Some(cached) = ctx.cached_static(&cache_key) {
        return Ok(cached.clone());
    }
    let value = ctx.select(&key)?;
    debug!(key = cache_key.as_str(), "fixed static value");
    Ok(ctx.fix_static(cache_key, value).clone())
}

/// Draw a value of `key` not drawn before in this output.
pub fn exclusive(ctx: &mut EvalContext<'_>, scope: &str, raw_key: &str) -> Result<String, PromptError> {
    let key = ctx.key_name(raw_key)?;
    let used_key = scoped_key(scope, EXCLUSIVE_SCOPE_MARK, &key);
    let candidates = ctx
        .candidates(&key)
        .ok_or_else(|| PromptError::KeyNotFound(key.clone()))?;

    let available: Vec<String> = {
        let used = ctx.used_values(&used_key);
        candidates
            .iter()
            .filter(|candidate| used.map_or(true, |used| !used.contains(*candidate)))
            .cloned()
            .collect()
    };

    let chosen = ctx
        .choose(&available)
        .cloned()
        .ok_or_else(|| PromptError::ExclusiveExhausted {
            key: used_key.clone(),
        })?;
    ctx.mark_used(&used_key, &chosen);
    debug!(
        key = used_key.as_str(),
        remaining = available.len() - 1,
        "exclusive draw"
    );
    ctx.evaluate_entry(&key, &chosen)
}

/// Evaluate the text, record it under the name, and return it.
pub fn track(ctx: &mut EvalContext<'_>, raw_name: &str, raw_text: &str) -> Result<String, PromptError> {
    let name = ctx.key_name(raw_name)?;
    let text = ctx.evaluate(raw_text)?.trim().to_string();
    debug!(name = name.as_str(), "tracked text");
    ctx.track(name, text.clone());
    Ok(text)
}

/// Fix a static value directly. A key already fixed in this output keeps its value.
pub fn store(
    ctx: &mut EvalContext<'_>,
    scope: &str,
    raw_key: &str,
    raw_text: &str,
) -> Result<String, PromptError> {
    let key = scoped_key(scope, STATIC_SCOPE_MARK, &ctx.key_name(raw_key)?);
    if ctx.cached_static(&key).is_some() {
        debug!(key = key.as_str(), "static already fixed, store ignored");
        return Ok(String::new());
    }
    let value = ctx.evaluate(raw_text)?.trim().to_string();
    ctx.fix_static(key, value);
    Ok(String::new())
}
