use serde_json::Value;
use std::io;

use super::{flatten_fields, format_scalar, row_headers, row_sets};

/// Write the result as CSV to stdout. Results carrying rows (the schedule,
/// the frequency comparison) are written one row per record; anything else
/// becomes a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let outcome = match result {
        Value::Array(rows) => write_rows(&mut wtr, rows),
        Value::Object(map) => match row_sets(map).first() {
            Some((_, rows)) => write_rows(&mut wtr, rows),
            None => write_fields(&mut wtr, map),
        },
        other => wtr.write_record([format_scalar(other)]),
    };

    if let Err(e) = outcome.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV write error: {e}");
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let headers = row_headers(rows);
    if headers.is_empty() {
        return Ok(());
    }
    wtr.write_record(&headers)?;
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(format_scalar).unwrap_or_default())
                .collect();
            wtr.write_record(&record)?;
        }
    }
    Ok(())
}

fn write_fields<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    map: &serde_json::Map<String, Value>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in flatten_fields(map) {
        wtr.write_record([key, format_scalar(&val)])?;
    }
    Ok(())
}
