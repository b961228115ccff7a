//! CLI presentation: text and json formatters per command.

mod batch;
mod operators;
mod validation;

pub use batch::{format_batch_json, format_batch_text};
pub use operators::{format_operators_json, format_operators_text};
pub use validation::{format_validation_json, format_validation_text, TemplateSummary};
