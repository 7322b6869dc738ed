//! Schedule analysis: the computation envelope, schedule totals, payment
//! quotes and a side-by-side comparison of every payment frequency.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::frequency::PaymentFrequency;
use super::parameters::AmortizationScheduleParameters;
use super::rates::RateSet;
use super::schedule::{generate_schedule, AmortizationScheduleEntry, ScheduleTerms};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Totals over a generated schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub number_of_payments: u32,
    /// Payments the term was sized for (payments per year × years).
    pub scheduled_payments: u32,
    pub total_payments: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    /// Time to payoff in years, to two decimal places.
    pub payoff_years: Decimal,
    /// The last entry's payment, which may differ from the nominal one.
    pub final_payment: Money,
}

/// Full amortization result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub payment_frequency: PaymentFrequency,
    pub payments_per_year: u32,
    pub rates: RateSet,
    /// Unrounded monthly payment from the annuity formula.
    pub monthly_payment: Money,
    /// Nominal payment per period, rounded to cents.
    pub periodic_payment: Money,
    pub summary: ScheduleSummary,
    pub schedule: Vec<AmortizationScheduleEntry>,
}

/// Rates and payments without the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentQuote {
    pub payment_frequency: PaymentFrequency,
    pub payments_per_year: u32,
    pub rates: RateSet,
    pub monthly_payment: Money,
    pub periodic_payment: Money,
    /// Nominal payment × payments per year.
    pub annual_payment: Money,
}

/// Loan terms shared by every frequency in a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub principal: Money,
    pub quoted_interest_rate: Rate,
    pub amortization_period: u32,
}

/// One row of a frequency comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyComparison {
    pub payment_frequency: PaymentFrequency,
    pub label: String,
    pub periodic_payment: Money,
    pub number_of_payments: u32,
    pub total_interest: Money,
    pub total_payments: Money,
    pub payoff_years: Decimal,
    /// Interest saved relative to a monthly schedule (negative if more).
    pub interest_saved_vs_monthly: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate the amortization schedule wrapped in the standard envelope.
pub fn analyze_amortization(
    params: &AmortizationScheduleParameters,
) -> MortgageResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();

    let (output, warnings) = build_output(params)?;

    info!(
        frequency = %params.payment_frequency,
        payments = output.summary.number_of_payments,
        total_interest = %output.summary.total_interest,
        "amortization schedule generated"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate amortization (semi-annual compounding, annuity payment)",
        params,
        warnings,
        elapsed,
        output,
    ))
}

/// Derive rates and payments without generating the schedule.
pub fn payment_quote(
    params: &AmortizationScheduleParameters,
) -> MortgageResult<ComputationOutput<PaymentQuote>> {
    let start = Instant::now();
    let (terms, rates, monthly) = ScheduleTerms::derive(params)?;
    let frequency = terms.payment_frequency;
    let nominal = terms.periodic_payment;
    let payments_per_year = frequency.payments_per_year();

    let mut warnings = Vec::new();
    if rates.monthly.is_zero() {
        warnings.push(zero_rate_warning());
    }

    let quote = PaymentQuote {
        payment_frequency: frequency,
        payments_per_year,
        rates,
        monthly_payment: monthly,
        periodic_payment: nominal,
        annual_payment: nominal * Decimal::from(payments_per_year),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annuity payment quote (semi-annual compounding)",
        params,
        warnings,
        elapsed,
        quote,
    ))
}

/// Run the same loan through every payment frequency.
pub fn compare_frequencies(
    input: &ComparisonInput,
) -> MortgageResult<ComputationOutput<Vec<FrequencyComparison>>> {
    let start = Instant::now();

    let mut rows = Vec::with_capacity(PaymentFrequency::ALL.len());
    for frequency in PaymentFrequency::ALL {
        let params = AmortizationScheduleParameters::new(
            input.principal,
            input.quoted_interest_rate,
            input.amortization_period,
            frequency,
        );
        let (output, _) = build_output(&params)?;
        rows.push(output);
    }

    let monthly_interest = rows
        .iter()
        .find(|o| o.payment_frequency == PaymentFrequency::Monthly)
        .map(|o| o.summary.total_interest)
        .unwrap_or(Decimal::ZERO);

    let comparison: Vec<FrequencyComparison> = rows
        .into_iter()
        .map(|o| FrequencyComparison {
            payment_frequency: o.payment_frequency,
            label: o.payment_frequency.label().to_string(),
            periodic_payment: o.periodic_payment,
            number_of_payments: o.summary.number_of_payments,
            total_interest: o.summary.total_interest,
            total_payments: o.summary.total_payments,
            payoff_years: o.summary.payoff_years,
            interest_saved_vs_monthly: monthly_interest - o.summary.total_interest,
        })
        .collect();

    let mut warnings = Vec::new();
    if input.quoted_interest_rate.is_zero() {
        warnings.push(zero_rate_warning());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment frequency comparison",
        input,
        warnings,
        elapsed,
        comparison,
    ))
}

/// Totals over a schedule. `payments_per_year` scales the payoff time.
pub fn summarize(
    schedule: &[AmortizationScheduleEntry],
    payments_per_year: u32,
    scheduled_payments: u32,
) -> ScheduleSummary {
    let mut total_payments = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    for entry in schedule {
        total_payments += entry.periodic_payment;
        total_interest += entry.interest_payment;
        total_principal += entry.principal_payment;
    }

    let number_of_payments = schedule.len() as u32;
    let payoff_years = if payments_per_year == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(number_of_payments) / Decimal::from(payments_per_year)).round_dp(2)
    };

    ScheduleSummary {
        number_of_payments,
        scheduled_payments,
        total_payments,
        total_interest,
        total_principal,
        payoff_years,
        final_payment: schedule
            .last()
            .map(|e| e.periodic_payment)
            .unwrap_or(Decimal::ZERO),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_output(
    params: &AmortizationScheduleParameters,
) -> MortgageResult<(AmortizationOutput, Vec<String>)> {
    let (terms, rates, monthly) = ScheduleTerms::derive(params)?;
    let frequency = terms.payment_frequency;
    let nominal = terms.periodic_payment;
    let scheduled_payments = terms.scheduled_payments();

    debug!(
        annual_rate = %rates.annual,
        monthly_rate = %rates.monthly,
        periodic_rate = %rates.periodic,
        monthly_payment = %monthly,
        periodic_payment = %nominal,
        "derived payment terms"
    );

    let schedule = generate_schedule(terms)?;
    let payments_per_year = frequency.payments_per_year();
    let summary = summarize(&schedule, payments_per_year, scheduled_payments);

    let mut warnings = Vec::new();
    if rates.monthly.is_zero() {
        warnings.push(zero_rate_warning());
    }
    if summary.number_of_payments < scheduled_payments {
        warnings.push(format!(
            "Loan is paid off after {} of {} scheduled payments ({} years)",
            summary.number_of_payments, scheduled_payments, summary.payoff_years
        ));
    }
    if summary.final_payment != nominal {
        warnings.push(format!(
            "Final payment of {} differs from the nominal payment of {}",
            summary.final_payment, nominal
        ));
    }
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "schedule generated with warnings");
    }

    Ok((
        AmortizationOutput {
            payment_frequency: frequency,
            payments_per_year,
            rates,
            monthly_payment: monthly,
            periodic_payment: nominal,
            summary,
            schedule,
        },
        warnings,
    ))
}

fn zero_rate_warning() -> String {
    "Zero interest rate: principal is repaid in equal instalments".to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
