//! Level payment derivation.

use rust_decimal::{Decimal, RoundingStrategy};

use super::frequency::PaymentFrequency;
use super::rates::checked_pow;
use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// Decimal places of the currency's minor unit.
pub const CURRENCY_DP: u32 = 2;

/// Round half-up to cents.
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Monthly payment from the annuity formula
/// `P × i / (1 − (1 + i)^−n)`, or `P / n` at a zero rate.
pub fn monthly_payment(principal: Money, monthly_rate: Rate, months: u32) -> MortgageResult<Money> {
    if months == 0 {
        return Err(MortgageError::InvalidInput {
            field: "months".into(),
            reason: "Number of monthly periods must be > 0".into(),
        });
    }

    let n = Decimal::from(months);
    if monthly_rate.is_zero() {
        return Ok(principal / n);
    }

    // Past the Decimal range the discount term is negligible.
    let discount = match checked_pow(Decimal::ONE + monthly_rate, months) {
        Some(growth) if growth.is_zero() => {
            return Err(MortgageError::DivisionByZero {
                context: "annuity growth factor".into(),
            })
        }
        Some(growth) => Decimal::ONE / growth,
        None => Decimal::ZERO,
    };

    let denominator = Decimal::ONE - discount;
    if denominator.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "annuity denominator".into(),
        });
    }

    Ok(principal * monthly_rate / denominator)
}

/// Nominal periodic payment, rounded to cents.
pub fn periodic_payment(monthly_payment: Money, frequency: PaymentFrequency) -> Money {
    round_currency(frequency.to_periodic_payment(monthly_payment))
}
