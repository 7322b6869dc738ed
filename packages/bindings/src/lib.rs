use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Serialize;

use mortgage_core::amortization::{self, rates, AmortizationScheduleParameters, PaymentFrequency};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Serialize)]
struct FrequencyOption {
    value: PaymentFrequency,
    label: &'static str,
    payments_per_year: u32,
    accelerated: bool,
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: AmortizationScheduleParameters =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::analyze_amortization(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn payment_quote(input_json: String) -> NapiResult<String> {
    let input: AmortizationScheduleParameters =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::payment_quote(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_frequencies(input_json: String) -> NapiResult<String> {
    let input: amortization::ComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::compare_frequencies(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Rates as strings to keep full decimal precision across the boundary.
#[napi]
pub fn convert_rates(quoted_rate: String, frequency: String) -> NapiResult<String> {
    let quoted: Decimal = quoted_rate.parse().map_err(to_napi_error)?;
    amortization::validate_quoted_rate(quoted).map_err(to_napi_error)?;
    let frequency: PaymentFrequency = frequency.parse().map_err(to_napi_error)?;
    serde_json::to_string(&rates::convert_rates(quoted, frequency)).map_err(to_napi_error)
}

/// Options for a frequency picker, in display order.
#[napi]
pub fn payment_frequencies() -> NapiResult<String> {
    let options: Vec<FrequencyOption> = PaymentFrequency::ALL
        .into_iter()
        .map(|f| FrequencyOption {
            value: f,
            label: f.label(),
            payments_per_year: f.payments_per_year(),
            accelerated: f.is_accelerated(),
        })
        .collect();
    serde_json::to_string(&options).map_err(to_napi_error)
}
