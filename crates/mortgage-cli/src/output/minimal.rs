use serde_json::Value;

use super::format_scalar;

/// Print just the headline value: the nominal payment for schedules and
/// quotes, the periodic rate for conversions, and one line per frequency
/// for comparisons.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(rows) => {
            for row in rows {
                let label = row.get("label").map(format_scalar).unwrap_or_default();
                let payment = row
                    .get("periodic_payment")
                    .map(format_scalar)
                    .unwrap_or_default();
                println!("{label}: {payment}");
            }
        }
        Value::Object(map) => {
            let priority_keys = ["periodic_payment", "periodic"];
            for key in priority_keys {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    println!("{}", format_scalar(val));
                    return;
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_scalar(val));
            }
        }
        other => println!("{}", format_scalar(other)),
    }
}
