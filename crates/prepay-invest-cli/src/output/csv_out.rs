use serde_json::Value;
use std::io::{self, Write};

use super::{flatten_fields, result_body, schedule_rows};

/// Write output as CSV to stdout.
///
/// Results carrying a schedule are written one row per month; everything
/// else becomes a two-column `field,value` listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        log::error!("CSV write error: {}", e);
    }
}

fn write_csv<W: Write>(out: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    let body = result_body(value);

    if let Some(rows) = schedule_rows(body) {
        let headers: Vec<&str> = match rows.first() {
            Some(Value::Object(first)) => first.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        };
        wtr.write_record(&headers)?;
        for row in rows {
            let record: Vec<String> = headers
                .iter()
                .map(|h| row.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            wtr.write_record(&record)?;
        }
    } else if let Value::Object(map) = body {
        wtr.write_record(["field", "value"])?;
        for (key, val) in flatten_fields(map) {
            wtr.write_record([key, format_csv_value(&val)])?;
        }
    } else {
        wtr.write_record([format_csv_value(body)])?;
    }

    wtr.flush()?;
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_schedule_written_per_month() {
        let v = json!({"result": {
            "months_to_payoff": 2,
            "schedule": [
                {"month": 1, "payment": "10"},
                {"month": 2, "payment": "4.5"}
            ]
        }});
        let out = render(&v);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "2,4.5");
    }

    #[test]
    fn test_summary_written_as_fields() {
        let v = json!({"result": {"verdict": "Prepay", "invest": {"growth": "12"}}});
        let out = render(&v);
        assert!(out.starts_with("field,value"));
        assert!(out.contains("invest.growth,12"));
    }
}
