pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The payload inside the `result` envelope, with an enum tag such as
/// `{"Recurring": {...}}` peeled off.
pub(crate) fn result_body(value: &Value) -> &Value {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    match result {
        Value::Object(map) if map.len() == 1 => match map.values().next() {
            Some(inner @ Value::Object(_)) => inner,
            _ => result,
        },
        _ => result,
    }
}

/// Flatten nested objects into `parent.child` keys. Arrays are left for the
/// caller (schedules get their own table).
pub(crate) fn flatten_fields(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut fields = Vec::new();
    flatten_into("", map, &mut fields);
    fields
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, out),
            Value::Array(_) => {}
            _ => out.push((name, val.clone())),
        }
    }
}

/// Rows of the month-by-month schedule, when the result carries one.
pub(crate) fn schedule_rows(body: &Value) -> Option<&Vec<Value>> {
    match body.get("schedule") {
        Some(Value::Array(rows)) if !rows.is_empty() => Some(rows),
        _ => None,
    }
}
