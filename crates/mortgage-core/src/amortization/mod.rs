//! Fixed-rate mortgage amortization.
//!
//! Quoted (semi-annually compounded) rates are converted to effective monthly
//! and periodic rates, the level payment is derived from the annuity formula,
//! and the payoff schedule is generated period by period. All math in
//! `rust_decimal::Decimal`.

pub mod analysis;
pub mod frequency;
pub mod parameters;
pub mod payment;
pub mod rates;
pub mod schedule;

pub use analysis::{
    analyze_amortization, compare_frequencies, payment_quote, AmortizationOutput,
    ComparisonInput, FrequencyComparison, PaymentQuote, ScheduleSummary,
};
pub use frequency::{FrequencyPolicy, PaymentFrequency, PaymentStep};
pub use parameters::{validate_quoted_rate, AmortizationScheduleParameters, MAX_QUOTED_RATE};
pub use rates::RateSet;
pub use schedule::{
    calculate_amortization_schedule, generate_schedule, AmortizationScheduleEntry, ScheduleIter,
    ScheduleTerms,
};
