use serde_json::{Map, Value};
use std::io;

use super::{bank_rows, flatten};

/// Write output as CSV to stdout.
///
/// Simulations and bank tables become one row per bank; single results
/// become two-column `field,value` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let outcome = if let Some(banks) = bank_rows(value) {
        write_rows(&mut wtr, banks)
    } else {
        let result = value.get("result").unwrap_or(value);
        match result {
            Value::Array(rows) => write_rows(&mut wtr, rows),
            Value::Object(_) => write_fields(&mut wtr, &flatten(result)),
            other => wtr.write_record([format_csv_value(other)]),
        }
    };

    if let Err(e) = outcome.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        tracing::error!(error = %e, "failed to write CSV output");
    }
}

fn write_fields<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    fields: &Map<String, Value>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in fields {
        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let flat: Vec<Map<String, Value>> = rows.iter().map(flatten).collect();
    if flat[0].is_empty() {
        for item in rows {
            wtr.write_record([format_csv_value(item)])?;
        }
        return Ok(());
    }

    let header_row: Vec<String> = flat[0].keys().cloned().collect();
    wtr.write_record(&header_row)?;
    for row in &flat {
        let record: Vec<String> = header_row
            .iter()
            .map(|h| row.get(h).map(format_csv_value).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
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
