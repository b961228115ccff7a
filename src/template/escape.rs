//! Entity escaping for characters that carry meaning in template syntax.
//!
//! Escaped text can be spliced back into a template and rescanned without
//! being mistaken for expressions, separators or list items.

/// Syntax characters and their entity forms. `&` comes first so escaping never
/// double-encodes an entity produced by a later pair.
const ESCAPES: [(&str, &str); 5] = [
    ("&", "&amp;"),
    ("|", "&pipe;"),
    ("{", "&lbrace;"),
    ("}", "&rbrace;"),
    (",", "&comma;"),
];

/// Replace syntax characters with their entity forms.
pub fn escape(text: &str) -> String {
    ESCAPES
        .iter()
        .fold(text.to_string(), |acc, (raw, entity)| acc.replace(raw, entity))
}

/// Restore syntax characters from their entity forms.
pub fn unescape(text: &str) -> String {
    ESCAPES
        .iter()
        .rev()
        .fold(text.to_string(), |acc, (raw, entity)| acc.replace(entity, raw))
}
