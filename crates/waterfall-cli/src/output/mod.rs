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

/// The per-scenario results when `value` is a waterfall envelope.
pub(crate) fn waterfall_results(value: &Value) -> Option<&Vec<Value>> {
    match value.get("result") {
        Some(Value::Array(results))
            if results
                .first()
                .is_some_and(|r| r.get("shareClassProceeds").is_some()) =>
        {
            Some(results)
        }
        _ => None,
    }
}

/// Render a scalar JSON value as plain text; `null` becomes `empty`.
pub(crate) fn plain(value: &Value, empty: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => empty.to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| plain(v, empty))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
