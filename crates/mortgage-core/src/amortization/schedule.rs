//! Payoff schedule generation.
//!
//! Each period accrues interest on the balance carried into it, rounded
//! half-up to cents. The principal share is whatever is left of the nominal
//! payment and is never rounded on its own, so all rounding drift lands in
//! the final payment. The final period pays off the whole balance, either
//! because the balance has fallen below the nominal payment or because the
//! scheduled term has been reached with less than two nominal payments
//! outstanding.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::frequency::PaymentFrequency;
use super::parameters::AmortizationScheduleParameters;
use super::payment::{monthly_payment, periodic_payment, round_currency};
use super::rates::{convert_rates, RateSet};
use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Iteration ceiling, in years of payments, before a schedule is declared
/// non-convergent.
const MAX_SCHEDULE_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One period of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationScheduleEntry {
    /// 1-based position in the schedule.
    pub payment_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    /// Amount paid this period: interest + principal.
    pub periodic_payment: Money,
    pub interest_payment: Money,
    pub principal_payment: Money,
    /// Balance after this period's payment.
    pub remaining_principal: Money,
}

/// Everything the generator needs once rates and payment are derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTerms {
    pub principal: Money,
    pub periodic_rate: Rate,
    /// Nominal payment, already rounded to cents.
    pub periodic_payment: Money,
    pub payment_frequency: PaymentFrequency,
    pub amortization_period: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

impl ScheduleTerms {
    /// Derive rates and the nominal payment from validated parameters.
    pub fn from_parameters(params: &AmortizationScheduleParameters) -> MortgageResult<Self> {
        Self::derive(params).map(|(terms, _, _)| terms)
    }

    /// Like `from_parameters`, also returning the rate chain and the
    /// unrounded monthly payment the terms were built from.
    pub fn derive(
        params: &AmortizationScheduleParameters,
    ) -> MortgageResult<(Self, RateSet, Money)> {
        params.validate()?;
        let rates = convert_rates(params.quoted_interest_rate, params.payment_frequency);
        let monthly = monthly_payment(
            params.principal,
            rates.monthly,
            params.months_to_amortization(),
        )?;
        let terms = Self {
            principal: params.principal,
            periodic_rate: rates.periodic,
            periodic_payment: periodic_payment(monthly, params.payment_frequency),
            payment_frequency: params.payment_frequency,
            amortization_period: params.amortization_period,
            first_payment_date: params.first_payment_date,
        };
        Ok((terms, rates, monthly))
    }

    /// Number of payments in the scheduled term.
    pub fn scheduled_payments(&self) -> u32 {
        self.payment_frequency
            .payments_per_year()
            .saturating_mul(self.amortization_period)
    }

    pub fn max_iterations(&self) -> u32 {
        self.payment_frequency.payments_per_year() * MAX_SCHEDULE_YEARS
    }

    fn validate(&self) -> MortgageResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: "principal".into(),
                reason: "Principal must be positive".into(),
            });
        }
        if self.periodic_rate < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: "periodic_rate".into(),
                reason: "Periodic rate cannot be negative".into(),
            });
        }
        if self.amortization_period == 0 {
            return Err(MortgageError::InvalidInput {
                field: "amortization_period".into(),
                reason: "Amortization period must be at least one year".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lazy generator
// ---------------------------------------------------------------------------

/// Yields schedule entries one period at a time until the balance is zero.
/// After an error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct ScheduleIter {
    terms: ScheduleTerms,
    remaining: Money,
    payment_number: u32,
    scheduled_payments: u32,
    max_iterations: u32,
    halted: bool,
}

impl ScheduleIter {
    pub fn new(terms: ScheduleTerms) -> MortgageResult<Self> {
        terms.validate()?;
        Ok(Self {
            remaining: terms.principal,
            payment_number: 1,
            scheduled_payments: terms.scheduled_payments(),
            max_iterations: terms.max_iterations(),
            halted: false,
            terms,
        })
    }

    fn non_convergent(&mut self, iterations: u32) -> Option<MortgageResult<AmortizationScheduleEntry>> {
        self.halted = true;
        Some(Err(MortgageError::NonConvergent {
            iterations,
            remaining: self.remaining,
        }))
    }
}

impl Iterator for ScheduleIter {
    type Item = MortgageResult<AmortizationScheduleEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted || self.remaining <= Decimal::ZERO {
            return None;
        }
        if self.payment_number > self.max_iterations {
            return self.non_convergent(self.max_iterations);
        }

        let nominal = self.terms.periodic_payment;
        let interest_payment = round_currency(self.remaining * self.terms.periodic_rate);

        // At the scheduled term only a rounding residual is trued up.
        let at_term = self.payment_number >= self.scheduled_payments
            && self.remaining < nominal * Decimal::TWO;
        let is_final = self.remaining < nominal || at_term;
        let principal_payment = if is_final {
            self.remaining
        } else {
            nominal - interest_payment
        };

        // Payment does not cover the period's interest.
        if principal_payment <= Decimal::ZERO {
            return self.non_convergent(self.payment_number);
        }

        self.remaining -= principal_payment;

        let payment_date = self.terms.first_payment_date.and_then(|first| {
            self.terms
                .payment_frequency
                .policy()
                .payment_date(first, self.payment_number)
        });

        let entry = AmortizationScheduleEntry {
            payment_number: self.payment_number,
            payment_date,
            periodic_payment: principal_payment + interest_payment,
            interest_payment,
            principal_payment,
            remaining_principal: self.remaining,
        };
        self.payment_number += 1;
        Some(Ok(entry))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Generate the full schedule for already-derived terms.
pub fn generate_schedule(terms: ScheduleTerms) -> MortgageResult<Vec<AmortizationScheduleEntry>> {
    let capacity = terms.scheduled_payments() as usize;
    let mut schedule = Vec::with_capacity(capacity);
    for entry in ScheduleIter::new(terms)? {
        schedule.push(entry?);
    }
    Ok(schedule)
}

/// Validate parameters, derive rates and payment, and generate the schedule.
pub fn calculate_amortization_schedule(
    params: &AmortizationScheduleParameters,
) -> MortgageResult<Vec<AmortizationScheduleEntry>> {
    generate_schedule(ScheduleTerms::from_parameters(params)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
