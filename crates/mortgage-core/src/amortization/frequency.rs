//! Payment frequency policy.
//!
//! Every frequency-dependent rule lives in one lookup table: payments per
//! year, the share of the monthly payment paid each period, the exponent
//! converting a monthly rate into a periodic rate, and the calendar step
//! between payment dates.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rates::pow_ratio;
use crate::error::MortgageError;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How often a payment is made. Discriminants index `POLICY_TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[serde(alias = "Monthly")]
    Monthly = 0,
    /// Half the monthly payment, 26 times a year.
    #[serde(alias = "Accelerated Bi-weekly")]
    AcceleratedBiWeekly = 1,
    /// Monthly payment × 12 / 26.
    #[serde(alias = "Bi-weekly")]
    BiWeekly = 2,
    /// A quarter of the monthly payment, 52 times a year.
    #[serde(alias = "Accelerated weekly")]
    AcceleratedWeekly = 3,
    /// Monthly payment × 12 / 52.
    #[serde(alias = "Weekly")]
    Weekly = 4,
}

/// Calendar distance between consecutive payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStep {
    Months(u32),
    Days(u64),
}

/// Frequency-dependent rules for one `PaymentFrequency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyPolicy {
    pub payments_per_year: u32,
    /// Periodic payment = monthly payment × numerator / denominator.
    pub payment_ratio: (u32, u32),
    /// Periodic rate = (1 + monthly rate)^(numerator / denominator) − 1,
    /// i.e. 12 / payments_per_year in lowest terms.
    pub rate_exponent: (u32, u32),
    pub label: &'static str,
    pub step: PaymentStep,
}

static POLICY_TABLE: [FrequencyPolicy; 5] = [
    FrequencyPolicy {
        payments_per_year: 12,
        payment_ratio: (1, 1),
        rate_exponent: (1, 1),
        label: "Monthly",
        step: PaymentStep::Months(1),
    },
    FrequencyPolicy {
        payments_per_year: 26,
        payment_ratio: (1, 2),
        rate_exponent: (6, 13),
        label: "Accelerated Bi-weekly",
        step: PaymentStep::Days(14),
    },
    FrequencyPolicy {
        payments_per_year: 26,
        payment_ratio: (12, 26),
        rate_exponent: (6, 13),
        label: "Bi-weekly",
        step: PaymentStep::Days(14),
    },
    FrequencyPolicy {
        payments_per_year: 52,
        payment_ratio: (1, 4),
        rate_exponent: (3, 13),
        label: "Accelerated weekly",
        step: PaymentStep::Days(7),
    },
    FrequencyPolicy {
        payments_per_year: 52,
        payment_ratio: (12, 52),
        rate_exponent: (3, 13),
        label: "Weekly",
        step: PaymentStep::Days(7),
    },
];

// ---------------------------------------------------------------------------
// PaymentFrequency
// ---------------------------------------------------------------------------

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 5] = [
        PaymentFrequency::Monthly,
        PaymentFrequency::AcceleratedBiWeekly,
        PaymentFrequency::BiWeekly,
        PaymentFrequency::AcceleratedWeekly,
        PaymentFrequency::Weekly,
    ];

    pub fn policy(self) -> &'static FrequencyPolicy {
        &POLICY_TABLE[self as usize]
    }

    pub fn payments_per_year(self) -> u32 {
        self.policy().payments_per_year
    }

    pub fn label(self) -> &'static str {
        self.policy().label
    }

    pub fn is_accelerated(self) -> bool {
        matches!(
            self,
            PaymentFrequency::AcceleratedBiWeekly | PaymentFrequency::AcceleratedWeekly
        )
    }

    pub fn to_periodic_rate(self, monthly_rate: Rate) -> Rate {
        self.policy().to_periodic_rate(monthly_rate)
    }

    pub fn to_periodic_payment(self, monthly_payment: Money) -> Money {
        self.policy().to_periodic_payment(monthly_payment)
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentFrequency {
    type Err = MortgageError;

    /// Accepts variant names in any case with `-`, `_` or spaces,
    /// e.g. `accelerated-bi-weekly` or `Accelerated Bi-weekly`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "monthly" => Ok(PaymentFrequency::Monthly),
            "acceleratedbiweekly" => Ok(PaymentFrequency::AcceleratedBiWeekly),
            "biweekly" => Ok(PaymentFrequency::BiWeekly),
            "acceleratedweekly" => Ok(PaymentFrequency::AcceleratedWeekly),
            "weekly" => Ok(PaymentFrequency::Weekly),
            _ => Err(MortgageError::InvalidInput {
                field: "payment_frequency".into(),
                reason: format!(
                    "Unknown payment frequency '{s}'; expected monthly, accelerated-bi-weekly, \
                     bi-weekly, accelerated-weekly or weekly"
                ),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// FrequencyPolicy
// ---------------------------------------------------------------------------

impl FrequencyPolicy {
    /// Effective rate for one payment period, equivalent to `monthly_rate`.
    pub fn to_periodic_rate(&self, monthly_rate: Rate) -> Rate {
        let (num, den) = self.rate_exponent;
        if num == den {
            return monthly_rate;
        }
        pow_ratio(Decimal::ONE + monthly_rate, num, den) - Decimal::ONE
    }

    /// Unrounded periodic payment derived from the monthly payment.
    pub fn to_periodic_payment(&self, monthly_payment: Money) -> Money {
        let (num, den) = self.payment_ratio;
        if num == den {
            return monthly_payment;
        }
        monthly_payment * Decimal::from(num) / Decimal::from(den)
    }

    /// Date of the `payment_number`-th payment (1-based). Monthly dates that
    /// fall past the end of a shorter month are clamped to its last day.
    pub fn payment_date(&self, first: NaiveDate, payment_number: u32) -> Option<NaiveDate> {
        let offset = payment_number.checked_sub(1)?;
        match self.step {
            PaymentStep::Months(months) => {
                first.checked_add_months(Months::new(months.checked_mul(offset)?))
            }
            PaymentStep::Days(days) => {
                first.checked_add_days(Days::new(days.checked_mul(u64::from(offset))?))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
