use serde_json::Value;

use super::result_body;

/// Fields that answer each command, most decisive first.
const PRIORITY_KEYS: [&str; 6] = [
    "verdict",
    "months_to_payoff",
    "monthly_installment",
    "future_value",
    "interest_saved",
    "total_interest",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let body = result_body(value);

    if let Value::Object(map) = body {
        if let Some(val) = PRIORITY_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|val| !val.is_null())
        {
            return format_minimal(val);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(body)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_wins() {
        let v = json!({"result": {"margin": "1", "verdict": "Invest", "horizon_months": 60}});
        assert_eq!(minimal_answer(&v), "Invest");
    }

    #[test]
    fn test_variant_result() {
        let v = json!({"result": {"Recurring": {"extra_monthly": "5000", "months_to_payoff": 38}}});
        assert_eq!(minimal_answer(&v), "38");
    }
}
