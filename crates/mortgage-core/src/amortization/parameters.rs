use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::frequency::PaymentFrequency;
use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Longest amortization period accepted, in years.
pub const MAX_AMORTIZATION_YEARS: u32 = 30;

/// Highest quoted rate accepted (100%).
pub const MAX_QUOTED_RATE: Rate = dec!(1);

/// Check a quoted rate lies in `[0, MAX_QUOTED_RATE]`.
pub fn validate_quoted_rate(rate: Rate) -> MortgageResult<()> {
    if rate < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "quoted_interest_rate".into(),
            reason: "Quoted interest rate cannot be negative".into(),
        });
    }
    if rate > MAX_QUOTED_RATE {
        return Err(MortgageError::InvalidInput {
            field: "quoted_interest_rate".into(),
            reason: format!("Quoted interest rate cannot exceed {MAX_QUOTED_RATE}"),
        });
    }
    Ok(())
}

/// Inputs for one amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationScheduleParameters {
    /// Loan principal.
    pub principal: Money,
    /// Quoted nominal annual rate, compounded semi-annually (0.0525 = 5.25%).
    pub quoted_interest_rate: Rate,
    /// Amortization period in whole years.
    pub amortization_period: u32,
    pub payment_frequency: PaymentFrequency,
    /// Date of the first payment; when present every entry is dated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

impl AmortizationScheduleParameters {
    pub fn new(
        principal: Money,
        quoted_interest_rate: Rate,
        amortization_period: u32,
        payment_frequency: PaymentFrequency,
    ) -> Self {
        Self {
            principal,
            quoted_interest_rate,
            amortization_period,
            payment_frequency,
            first_payment_date: None,
        }
    }

    pub fn with_first_payment_date(mut self, date: NaiveDate) -> Self {
        self.first_payment_date = Some(date);
        self
    }

    /// Total number of monthly periods in the amortization term.
    pub fn months_to_amortization(&self) -> u32 {
        12 * self.amortization_period
    }

    pub fn validate(&self) -> MortgageResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: "principal".into(),
                reason: "Principal must be positive".into(),
            });
        }
        validate_quoted_rate(self.quoted_interest_rate)?;
        if self.amortization_period == 0 {
            return Err(MortgageError::InvalidInput {
                field: "amortization_period".into(),
                reason: "Amortization period must be at least one year".into(),
            });
        }
        if self.amortization_period > MAX_AMORTIZATION_YEARS {
            return Err(MortgageError::InvalidInput {
                field: "amortization_period".into(),
                reason: format!(
                    "Amortization period cannot exceed {MAX_AMORTIZATION_YEARS} years"
                ),
            });
        }
        Ok(())
    }
}
