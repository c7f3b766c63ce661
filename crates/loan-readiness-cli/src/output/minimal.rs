use serde_json::Value;

use super::bank_rows;

/// Print just the key answer value from the output.
///
/// Simulations print one `bank: verdict (ratio)` line per bank. Everything
/// else looks for well-known result fields in order of priority, then falls
/// back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    if let Some(banks) = bank_rows(value) {
        for bank in banks {
            println!(
                "{}: {} ({})",
                format_minimal(&bank["bank_id"]),
                format_minimal(&bank["verdict"]),
                format_minimal(&bank["ratio"]),
            );
        }
        return;
    }

    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["status", "monthly_installment", "loan"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    if let Value::Array(items) = result_obj {
        for item in items {
            match item.get("id") {
                Some(id) => println!("{}", format_minimal(id)),
                None => println!("{}", format_minimal(item)),
            }
        }
        return;
    }

    println!("{}", format_minimal(result_obj));
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
