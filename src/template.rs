//! Template model
//!
//! A template is immutable input: an entrypoint to resolve, named data values
//! (scalars or candidate lists), named logic sub-templates, and optional
//! rewrites of the caller's `text` parameter and of every output.

use crate::engine::locator::validate_braces;
use crate::error::{ApiError, PromptError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

pub mod escape;
pub mod postprocess;
pub mod rewrite;

pub use postprocess::Postprocessor;
pub use rewrite::{RewriteRule, Rewrites};

/// Key prefixes reserved for values the generator injects.
pub const RESERVED_PREFIXES: [&str; 2] = ["meta_", "track_"];

/// A named data value: one scalar, or an ordered list of candidates.
///
/// Numbers and booleans in the source document are kept as their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum DataValue {
    Scalar(String),
    List(Vec<String>),
}

impl DataValue {
    /// Candidate texts; a scalar is a single candidate.
    pub fn candidates(&self) -> &[String] {
        match self {
            DataValue::Scalar(value) => std::slice::from_ref(value),
            DataValue::List(values) => values,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, DataValue::List(_))
    }
}

impl TryFrom<serde_json::Value> for DataValue {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or_else(|| {
                        format!("list items must be strings or numbers, found {}", item)
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(DataValue::List),
            other => scalar_text(&other)
                .map(DataValue::Scalar)
                .ok_or_else(|| format!("data value must be a string, number or list, found {}", other)),
        }
    }
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataValue::Scalar(value) => serializer.serialize_str(value),
            DataValue::List(values) => values.serialize(serializer),
        }
    }
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Scalar(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Scalar(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for DataValue {
    fn from(values: Vec<S>) -> Self {
        DataValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Root text of a template.
///
/// A list picks one string, concatenates one pick per sub-list, or keeps a
/// fixed leading string followed by one pick per sub-list. An object is a
/// tree of tags walked by the caller's tag paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entrypoint {
    Text(String),
    Parts(Vec<Entrypoint>),
    Tree(TagNode),
}

impl Entrypoint {
    /// Pick the text to resolve. `tags_path` feeds a tree-of-tags entrypoint
    /// and is ignored by the other forms.
    pub fn select<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        tags_path: Option<&str>,
    ) -> Result<String, PromptError> {
        let parts = match self {
            Entrypoint::Text(text) => return Ok(text.clone()),
            Entrypoint::Tree(root) => {
                return match tags_path.filter(|paths| !paths.trim().is_empty()) {
                    Some(paths) => Ok(root.resolve(paths)),
                    None => Err(PromptError::MissingParameter(TAGS_PATH.to_string())),
                }
            }
            Entrypoint::Parts(parts) => parts,
        };
        if parts.iter().any(|p| matches!(p, Entrypoint::Tree(_))) {
            return Err(PromptError::InvalidTemplate(
                "a tree of tags must be the whole entrypoint".to_string(),
            ));
        }
        let Some((first, rest)) = parts.split_first() else {
            return Ok(String::new());
        };

        let all_text = parts.iter().all(|p| matches!(p, Entrypoint::Text(_)));
        let rest_are_lists = rest.iter().all(|p| matches!(p, Entrypoint::Parts(_)));

        if all_text {
            let texts: Vec<&String> = parts
                .iter()
                .filter_map(|p| match p {
                    Entrypoint::Text(text) => Some(text),
                    _ => None,
                })
                .collect();
            return Ok(texts.choose(rng).map(|t| t.to_string()).unwrap_or_default());
        }
        if !rest_are_lists {
            return Err(PromptError::InvalidTemplate(
                "entrypoint list must hold strings, lists, or one string followed by lists"
                    .to_string(),
            ));
        }

        let mut pieces = Vec::with_capacity(parts.len());
        pieces.push(first.select(rng, tags_path)?);
        for part in rest {
            pieces.push(part.select(rng, tags_path)?);
        }
        Ok(pieces.join(" "))
    }

    fn texts(&self) -> Vec<&str> {
        match self {
            Entrypoint::Text(text) => vec![text.as_str()],
            Entrypoint::Parts(parts) => parts.iter().flat_map(Entrypoint::texts).collect(),
            Entrypoint::Tree(root) => root.texts(),
        }
    }
}

/// Parameter holding newline-separated `tag/tag/...` paths for a tree of tags.
pub const TAGS_PATH: &str = "tags_path";

/// One node of a tree-of-tags entrypoint: its own text plus child nodes by tag.
///
/// In JSON every key other than `text` names a child object. The root must
/// carry a text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct TagNode {
    pub text: Option<String>,
    pub children: BTreeMap<String, TagNode>,
}

impl TagNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            children: BTreeMap::new(),
        }
    }

    pub fn with_child(mut self, tag: impl Into<String>, child: TagNode) -> Self {
        self.children.insert(tag.into(), child);
        self
    }

    /// Texts of the nodes each path reaches, in path order, joined by newlines.
    ///
    /// Blank lines are skipped, as are paths that leave the tree or reach a
    /// node without text. The root text stands in when no path yields one.
    pub fn resolve(&self, tags_path: &str) -> String {
        let texts: Vec<&str> = tags_path
            .lines()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .filter_map(|path| self.walk(path))
            .filter_map(|node| node.text.as_deref())
            .collect();
        if texts.is_empty() {
            return self.text.clone().unwrap_or_default();
        }
        texts.join("\n")
    }

    fn walk(&self, path: &str) -> Option<&TagNode> {
        path.split('/')
            .map(str::trim)
            .try_fold(self, |node, tag| node.children.get(tag))
    }

    fn texts(&self) -> Vec<&str> {
        self.text
            .as_deref()
            .into_iter()
            .chain(self.children.values().flat_map(TagNode::texts))
            .collect()
    }
}

impl TryFrom<serde_json::Value> for TagNode {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let serde_json::Value::Object(entries) = value else {
            return Err(format!("tag node must be an object, found {}", value));
        };
        let mut node = TagNode::default();
        for (key, value) in entries {
            if key == "text" {
                match value {
                    serde_json::Value::String(text) => node.text = Some(text),
                    other => return Err(format!("tag text must be a string, found {}", other)),
                }
            } else {
                let child = TagNode::try_from(value).map_err(|e| format!("tag '{}': {}", key, e))?;
                node.children.insert(key, child);
            }
        }
        Ok(node)
    }
}

impl Serialize for TagNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(text) = &self.text {
            map.serialize_entry("text", text)?;
        }
        for (tag, child) in &self.children {
            map.serialize_entry(tag, child)?;
        }
        map.end()
    }
}

impl From<&str> for Entrypoint {
    fn from(value: &str) -> Self {
        Entrypoint::Text(value.to_string())
    }
}

impl From<String> for Entrypoint {
    fn from(value: String) -> Self {
        Entrypoint::Text(value)
    }
}

/// Immutable generation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub entrypoint: Entrypoint,

    #[serde(default)]
    pub data: BTreeMap<String, DataValue>,

    /// Named sub-templates, resolved when referenced and never drawn from.
    #[serde(default)]
    pub logic: BTreeMap<String, String>,

    /// Rewrites of the caller's `text` parameter before evaluation.
    #[serde(default)]
    pub preprocess: Vec<RewriteRule>,

    /// Field name to pattern, anchored at the start of the (rewritten) `text`
    /// parameter; groups land in `meta_regex_<field>`.
    #[serde(default)]
    pub regex: BTreeMap<String, String>,

    #[serde(default)]
    pub postprocess: Vec<RewriteRule>,
}

impl Template {
    pub fn new(entrypoint: impl Into<Entrypoint>) -> Self {
        Self {
            entrypoint: entrypoint.into(),
            data: BTreeMap::new(),
            logic: BTreeMap::new(),
            preprocess: Vec::new(),
            regex: BTreeMap::new(),
            postprocess: Vec::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_logic(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.logic.insert(key.into(), template.into());
        self
    }

    pub fn with_preprocess(mut self, pattern: &str, replacement: &str) -> Self {
        self.preprocess.push(RewriteRule::new(pattern, replacement));
        self
    }

    pub fn with_regex(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.regex.insert(field.into(), pattern.into());
        self
    }

    pub fn with_postprocess(mut self, pattern: &str, replacement: &str) -> Self {
        self.postprocess.push(RewriteRule::new(pattern, replacement));
        self
    }

    pub fn from_json_str(source: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a template from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let source = std::fs::read_to_string(path).map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&source)
    }

    /// Check brace balance of every template string and reserved key prefixes.
    pub fn validate(&self) -> Result<(), PromptError> {
        if let Entrypoint::Tree(root) = &self.entrypoint {
            if root.text.is_none() {
                return Err(PromptError::InvalidTemplate(
                    "tree of tags entrypoint must have a 'text' at its root".to_string(),
                ));
            }
        }
        for text in self.entrypoint.texts() {
            validate_braces(text)?;
        }
        for (key, value) in &self.data {
            check_reserved(key)?;
            for candidate in value.candidates() {
                validate_braces(candidate)?;
            }
        }
        for (key, text) in &self.logic {
            check_reserved(key)?;
            validate_braces(text)?;
        }
        Ok(())
    }
}

/// Reject keys that collide with generator-injected names.
pub fn check_reserved(key: &str) -> Result<(), PromptError> {
    match RESERVED_PREFIXES.iter().find(|prefix| key.starts_with(*prefix)) {
        Some(prefix) => Err(PromptError::ReservedKey {
            key: key.to_string(),
            prefix,
        }),
        None => Ok(()),
    }
}
