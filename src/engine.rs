//! Operator-resolution engine
//!
//! Locates `{...}` expressions, splits them into an operator token and raw
//! arguments, and resolves them recursively against a per-output
//! [`EvalContext`].

pub mod context;
pub mod evaluator;
pub mod locator;
pub mod operators;
pub mod registry;
pub mod splitter;

pub use context::{EvalContext, EvalLimits, Namespace};
pub use registry::{Operator, OperatorCall, Qualifier};
