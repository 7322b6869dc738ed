use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise piped stdin (JSON, or YAML since it is a superset).
/// Returns None if stdin is a TTY or empty.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: T = serde_yaml::from_str(trimmed)
        .map_err(|e| format!("Failed to parse stdin: {}", e))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortgage_core::amortization::{AmortizationScheduleParameters, PaymentFrequency};

    #[test]
    fn test_empty_input_is_none() {
        let parsed: Option<AmortizationScheduleParameters> = parse_piped("  \n").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_json_input() {
        let parsed: Option<AmortizationScheduleParameters> = parse_piped(
            r#"{"principal": "1000", "quoted_interest_rate": "0",
                "amortization_period": 1, "payment_frequency": "bi_weekly"}"#,
        )
        .unwrap();
        assert_eq!(parsed.unwrap().payment_frequency, PaymentFrequency::BiWeekly);
    }
}
