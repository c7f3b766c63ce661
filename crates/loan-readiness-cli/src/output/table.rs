use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{bank_rows, flatten};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(banks) = bank_rows(value) {
        print_simulation(value, banks);
        return;
    }

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Array(rows)) => print_array_table(rows),
            Some(result) => {
                print_field_table(&flatten(result));
                print_envelope_notes(map);
            }
            None => print_field_table(&flatten(value)),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_simulation(value: &Value, banks: &[Value]) {
    if let Some(summary) = value.pointer("/result/summary") {
        println!("Customer capacity");
        print_field_table(&flatten(summary));
        println!();
    }

    if banks.is_empty() {
        println!("(no banks match)");
    } else {
        print_array_table(banks);
        println!();
        for bank in banks {
            let name = format_value(&bank["bank_name"]);
            let verdict = format_value(&bank["verdict"]);
            println!("{:<18} {}", name, paint_verdict(&verdict));
        }
    }

    if let Some(map) = value.as_object() {
        print_envelope_notes(map);
    }
}

fn paint_verdict(verdict: &str) -> String {
    match verdict {
        "HIGH" => verdict.green().bold().to_string(),
        "BORDERLINE" => verdict.yellow().bold().to_string(),
        "LOW" => verdict.red().bold().to_string(),
        other => other.to_string(),
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(fields: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let rows: Vec<Map<String, Value>> = arr.iter().map(flatten).collect();
    let headers: Vec<String> = rows[0].keys().cloned().collect();

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in &rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(h).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
