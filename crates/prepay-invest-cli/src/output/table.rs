use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten_fields, result_body, schedule_rows};

/// Schedule columns in display order.
const SCHEDULE_COLUMNS: [&str; 6] = [
    "month",
    "opening_balance",
    "interest",
    "principal",
    "payment",
    "closing_balance",
];

/// Format output as a summary table, followed by the schedule when present.
pub fn print_table(value: &Value) {
    let body = result_body(value);

    if let Value::Object(map) = body {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in flatten_fields(map) {
            builder.push_record([key, format_value(&val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", format_value(body));
    }

    if let Some(rows) = schedule_rows(body) {
        println!();
        print_schedule(rows);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_schedule(rows: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_COLUMNS);
    for row in rows {
        builder.push_record(
            SCHEDULE_COLUMNS
                .iter()
                .map(|col| row.get(*col).map(format_value).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
