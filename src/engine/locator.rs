//! Expression locator: finds balanced `{...}` spans.

use crate::error::PromptError;
use std::ops::Range;

const CONTEXT_RADIUS: usize = 10;

/// Span of the next top-level expression at or after `from`, braces included.
///
/// Nested braces are counted so the span ends at the brace matching the first
/// `{`. Returns `Ok(None)` when no `{` remains.
pub fn next_expression(text: &str, from: usize) -> Result<Option<Range<usize>>, PromptError> {
    let Some(offset) = text[from..].find('{') else {
        return Ok(None);
    };
    let start = from + offset;
    let mut depth = 0usize;
    for (idx, byte) in text.bytes().enumerate().skip(start) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Some(start..idx + 1));
                }
            }
            _ => {}
        }
    }
    Err(malformed("unmatched opening brace '{'", text, start))
}

/// Check that every brace in `text` is matched.
pub fn validate_braces(text: &str) -> Result<(), PromptError> {
    let mut open = Vec::new();
    for (idx, byte) in text.bytes().enumerate() {
        match byte {
            b'{' => open.push(idx),
            b'}' => {
                if open.pop().is_none() {
                    return Err(malformed("unmatched closing brace '}'", text, idx));
                }
            }
            _ => {}
        }
    }
    match open.last() {
        Some(&idx) => Err(malformed("unmatched opening brace '{'", text, idx)),
        None => Ok(()),
    }
}

fn malformed(reason: &str, text: &str, idx: usize) -> PromptError {
    let start = floor_char_boundary(text, idx.saturating_sub(CONTEXT_RADIUS));
    let end = floor_char_boundary(text, (idx + CONTEXT_RADIUS).min(text.len()));
    PromptError::MalformedTemplate {
        reason: reason.to_string(),
        context: text[start..end].to_string(),
    }
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
