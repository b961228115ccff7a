//! Error types for template evaluation and the application surface.

use thiserror::Error;

/// Evaluation and template errors.
///
/// Any of these aborts the output currently being resolved; sibling outputs of
/// the same batch are unaffected.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Malformed template: {reason} near '{context}'")]
    MalformedTemplate { reason: String, context: String },

    #[error("Unknown operator '{0}'")]
    UnrecognizedOperator(String),

    #[error("Operator '{operator}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        operator: String,
        expected: String,
        actual: usize,
    },

    #[error("Operator '{operator}' cannot use non-numeric value '{value}'")]
    NumericParse { operator: String, value: String },

    #[error("Exclusive selection exhausted all values of '{key}'")]
    ExclusiveExhausted { key: String },

    #[error("Indirection cycle detected: {chain}")]
    IndirectionCycle { chain: String },

    #[error("Error operator triggered: {key} == {value}")]
    UserTriggered { key: String, value: String },

    #[error("Key '{0}' not found in template data")]
    KeyNotFound(String),

    #[error("Key '{0}' has no values to select from")]
    EmptyCandidates(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Required parameter '{0}' was not provided")]
    MissingParameter(String),

    #[error("Key '{key}' uses reserved prefix '{prefix}'")]
    ReservedKey { key: String, prefix: &'static str },

    #[error("Repeat count {count} exceeds maximum of {max}")]
    RepeatLimit { count: usize, max: usize },

    #[error("Evaluation nested deeper than {0} levels")]
    RecursionLimit(usize),

    #[error("{source} (in expression '{expression}')")]
    Located {
        expression: String,
        #[source]
        source: Box<PromptError>,
    },
}

impl PromptError {
    /// Attach the failing expression text. Only the innermost expression is kept.
    pub fn at(self, expression: &str) -> Self {
        match self {
            located @ PromptError::Located { .. } => located,
            other => PromptError::Located {
                expression: expression.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error without expression context.
    pub fn root_cause(&self) -> &PromptError {
        match self {
            PromptError::Located { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Innermost expression the error was raised in, if any.
    pub fn expression(&self) -> Option<&str> {
        match self {
            PromptError::Located { expression, .. } => Some(expression),
            _ => None,
        }
    }
}

/// Application-level errors: configuration, I/O and presentation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Prompt(#[from] PromptError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
