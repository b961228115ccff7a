//! Argument splitter: operator name and raw, unevaluated arguments.

/// One `{...}` expression broken into its parts. Nothing here is evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    /// Operator token before the first depth-zero `:`; `None` for implicit
    /// lookups and implicit one-of lists.
    pub name: Option<&'a str>,
    /// Everything after the operator token, or the whole body when implicit.
    pub body: &'a str,
    /// `body` split on depth-zero `|`.
    pub args: Vec<&'a str>,
}

const STORE_ASSIGN: &str = ":=";

/// Split an expression (outer braces included) into name and raw arguments.
pub fn split_expression(expression: &str) -> Invocation<'_> {
    let body = expression
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(expression);

    let (name, rest) = match split_name(body) {
        Some((name, rest)) => (Some(name), rest),
        None => (None, body),
    };

    Invocation {
        name,
        body: rest,
        args: split_args(rest),
    }
}

fn split_name(body: &str) -> Option<(&str, &str)> {
    if let Some(rest) = body.strip_prefix(STORE_ASSIGN).and_then(|r| r.strip_prefix(':')) {
        return Some((STORE_ASSIGN, rest));
    }
    let colon = find_top_level(body, b':')?;
    let name = &body[..colon];
    if name.contains('|') || name.contains('{') {
        return None;
    }
    Some((name.trim(), &body[colon + 1..]))
}

/// Split on `|` at nesting depth zero.
pub fn split_args(body: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, byte) in body.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'|' if depth == 0 => {
                args.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    args.push(&body[start..]);
    args
}

fn find_top_level(text: &str, needle: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, byte) in text.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b if b == needle && depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}
