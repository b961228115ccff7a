//! CLI domain: parse, route, help, output, and presentation only.
//! No generation logic; the route table dispatches to the generator.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{parse_param, Cli, Commands};
pub use presentation::{
    format_batch_json, format_batch_text, format_operators_json, format_operators_text,
    format_validation_json, format_validation_text, TemplateSummary,
};
pub use route::RunContext;
