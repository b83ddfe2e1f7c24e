pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten one level of nesting in a result object.
///
/// The price suggestion result groups its figures under `cashflow_target`
/// and `break_even`; tabular formats present those as dotted keys
/// (`cashflow_target.purchase_price`) rather than embedded JSON blobs.
pub fn flatten_result(map: &serde_json::Map<String, Value>) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    for (key, val) in map {
        match val {
            Value::Object(inner) => {
                for (inner_key, inner_val) in inner {
                    rows.push((format!("{}.{}", key, inner_key), inner_val.clone()));
                }
            }
            _ => rows.push((key.clone(), val.clone())),
        }
    }
    rows
}
