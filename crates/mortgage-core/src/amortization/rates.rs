//! Quoted, annual, monthly and periodic rate conversions.
//!
//! Canadian-style mortgage quotes compound semi-annually. The quoted rate is
//! turned into an effective annual rate, then an effective monthly rate, then
//! the effective rate for the chosen payment period.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::frequency::PaymentFrequency;
use crate::types::Rate;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const NEWTON_MAX_ITERATIONS: u32 = 60;
const NEWTON_TOLERANCE: Decimal = dec!(0.000000000000000000000001);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Every rate derived from one quoted rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSet {
    /// Nominal annual rate, compounded semi-annually.
    pub quoted: Rate,
    /// Effective annual rate.
    pub annual: Rate,
    /// Effective monthly rate.
    pub monthly: Rate,
    /// Effective rate per payment period.
    pub periodic: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// annual = (1 + quoted / 2)^2 − 1
pub fn quoted_to_annual(quoted: Rate) -> Rate {
    let half_year = Decimal::ONE + quoted / dec!(2);
    half_year * half_year - Decimal::ONE
}

/// monthly = (1 + annual)^(1/12) − 1
pub fn annual_to_monthly(annual: Rate) -> Rate {
    if annual.is_zero() {
        return Decimal::ZERO;
    }
    nth_root(Decimal::ONE + annual, 12) - Decimal::ONE
}

/// Quoted rate straight through to the rate for one payment period.
pub fn periodic_rate(quoted: Rate, frequency: PaymentFrequency) -> Rate {
    convert_rates(quoted, frequency).periodic
}

pub fn convert_rates(quoted: Rate, frequency: PaymentFrequency) -> RateSet {
    let annual = quoted_to_annual(quoted);
    let monthly = annual_to_monthly(annual);
    let periodic = frequency.to_periodic_rate(monthly);
    RateSet {
        quoted,
        annual,
        monthly,
        periodic,
    }
}

// ---------------------------------------------------------------------------
// Decimal power helpers
// ---------------------------------------------------------------------------

/// base^n by repeated multiplication.
pub(crate) fn iterative_pow(base: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result *= base;
    }
    result
}

/// base^n, or `None` once the product leaves the representable range.
pub(crate) fn checked_pow(base: Decimal, n: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(base)?;
    }
    Some(result)
}

/// Positive real n-th root via Newton's method, seeded from `f64::powf` so
/// the intermediate powers stay near `x`.
pub(crate) fn nth_root(x: Decimal, n: u32) -> Decimal {
    if x <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if x == Decimal::ONE || n == 1 {
        return x;
    }
    if n == 0 {
        return Decimal::ONE;
    }

    let n_dec = Decimal::from(n);
    let mut guess = x
        .to_f64()
        .map(|v| v.powf(1.0 / f64::from(n)))
        .and_then(Decimal::from_f64)
        .filter(|g| *g > Decimal::ZERO)
        .unwrap_or(Decimal::ONE);

    for _ in 0..NEWTON_MAX_ITERATIONS {
        let g_n_minus_1 = iterative_pow(guess, n - 1);
        if g_n_minus_1.is_zero() {
            break;
        }
        let delta = (g_n_minus_1 * guess - x) / (n_dec * g_n_minus_1);
        guess -= delta;

        if delta.abs() < NEWTON_TOLERANCE {
            break;
        }
    }

    guess
}

/// base^(num/den) for base > 0, as the den-th root of base^num.
pub(crate) fn pow_ratio(base: Decimal, num: u32, den: u32) -> Decimal {
    nth_root(iterative_pow(base, num), den)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
