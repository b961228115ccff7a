//! Generated batch formatters.

use crate::cli::output::describe;
use crate::error::ApiError;
use crate::generator::GenerationBatch;
use owo_colors::OwoColorize;
use serde_json::json;

/// Outputs separated by headers; a single output is printed bare.
pub fn format_batch_text(batch: &GenerationBatch) -> String {
    if batch.is_empty() {
        return "No prompts requested.".to_string();
    }
    let single = batch.len() == 1;
    let mut blocks = Vec::with_capacity(batch.len());
    for (index, result) in batch.results.iter().enumerate() {
        let body = match result {
            Ok(prompt) if single => prompt.output.clone(),
            Ok(prompt) => format!(
                "--- prompt {} pass {} (seed {}) ---\n{}",
                prompt.prompt_number + 1,
                prompt.pass_number,
                prompt.seed,
                prompt.output
            ),
            Err(e) => format!(
                "--- output {} ---\n{} {}",
                index + 1,
                "failed:".red().bold(),
                describe(e)
            ),
        };
        blocks.push(body);
    }
    blocks.join("\n\n")
}

pub fn format_batch_json(batch: &GenerationBatch) -> Result<String, ApiError> {
    let results: Vec<serde_json::Value> = batch
        .results
        .iter()
        .map(|result| match result {
            Ok(prompt) => serde_json::to_value(prompt),
            Err(e) => Ok(json!({
                "error": e.root_cause().to_string(),
                "expression": e.expression(),
            })),
        })
        .collect::<Result<_, _>>()?;
    let out = json!({
        "seed": batch.seed,
        "results": results,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}
