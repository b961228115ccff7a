//! Infiniprompt: Template-Driven Prompt Generation
//!
//! Templates combine named data with an embedded `{operator:arg|arg}` language.
//! Each generated output resolves the template top-down and lazily against its
//! own seeded state, so batches are reproducible from a single seed.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod logging;
pub mod template;

pub use error::{ApiError, PromptError};
pub use generator::{generate, GenerateRequest, GeneratedPrompt, GenerationBatch, Generator};
pub use template::Template;
