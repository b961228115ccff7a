//! Operator table formatters.

use crate::engine::Operator;
use crate::error::ApiError;
use comfy_table::Table;
use serde_json::json;

pub fn format_operators_text() -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Operator", "Aliases", "Arguments", "Usage"]);
    for operator in Operator::ALL {
        table.add_row(vec![
            operator.name().to_string(),
            operator.aliases().join(" "),
            operator.arity().describe(),
            operator.summary().to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_operators_json() -> Result<String, ApiError> {
    let operators: Vec<serde_json::Value> = Operator::ALL
        .iter()
        .map(|operator| {
            json!({
                "operator": operator,
                "aliases": operator.aliases(),
                "arguments": operator.arity().describe(),
                "usage": operator.summary(),
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&operators)?)
}
