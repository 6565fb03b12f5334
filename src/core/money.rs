//! Money arithmetic shared by validation, storage and aggregation.
//!
//! Amounts are carried as `f64` in entities and on the wire, but every
//! rounding, sum and ratio goes through [`Decimal`] so results do not depend on
//! binary floating point artifacts. An `f64` is converted through its shortest
//! round-trip decimal representation, so `10.005_f64` is treated as exactly
//! `10.005`.
//!
//! Rounding policy: half away from zero at two decimal places
//! (`10.005 -> 10.01`, `10.004 -> 10.00`, `-2.345 -> -2.35`).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for every amount and percentage.
pub const SCALE: u32 = 2;

/// Converts a finite `f64` to a [`Decimal`] via its shortest decimal form.
#[must_use]
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    value.to_string().parse::<Decimal>().ok()
}

fn round_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Rounds an amount to two decimals. Non-finite input is returned unchanged.
#[must_use]
pub fn round_amount(value: f64) -> f64 {
    to_decimal(value).map_or(value, |d| to_f64(round_decimal(d)))
}

/// Sums amounts exactly and rounds the total to two decimals.
#[must_use]
pub fn sum_amounts<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let total = amounts
        .into_iter()
        .filter_map(to_decimal)
        .fold(Decimal::ZERO, |acc, amount| acc + amount);
    to_f64(round_decimal(total))
}

/// `minuend - subtrahend`, rounded to two decimals. May be negative.
#[must_use]
pub fn subtract(minuend: f64, subtrahend: f64) -> f64 {
    match (to_decimal(minuend), to_decimal(subtrahend)) {
        (Some(a), Some(b)) => to_f64(round_decimal(a - b)),
        _ => minuend - subtrahend,
    }
}

/// `part / whole * 100` rounded to two decimals, or `0` when `whole` is zero.
#[must_use]
pub fn percentage(part: f64, whole: f64) -> f64 {
    let (Some(part), Some(whole)) = (to_decimal(part), to_decimal(whole)) else {
        return 0.0;
    };
    if whole.is_zero() {
        return 0.0;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(0.0, |pct| to_f64(round_decimal(pct)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_round_half_away_from_zero_at_boundary() {
        assert_eq!(round_amount(10.005), 10.01);
        assert_eq!(round_amount(10.004), 10.0);
        assert_eq!(round_amount(10.015), 10.02);
        assert_eq!(round_amount(0.125), 0.13);
        assert_eq!(round_amount(-2.345), -2.35);
    }

    #[test]
    fn test_round_keeps_exact_values() {
        assert_eq!(round_amount(320.5), 320.5);
        assert_eq!(round_amount(999_999.99), 999_999.99);
        assert_eq!(round_amount(0.0), 0.0);
    }

    #[test]
    fn test_round_non_finite_passthrough() {
        assert!(round_amount(f64::NAN).is_nan());
        assert_eq!(round_amount(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_sum_amounts_has_no_float_drift() {
        // 0.1 + 0.2 is 0.30000000000000004 in f64
        assert_eq!(sum_amounts([0.1, 0.2]), 0.3);
        assert_eq!(sum_amounts([100.25, 120.0, 100.25]), 320.5);
        assert_eq!(sum_amounts(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_subtract_can_go_negative() {
        assert_eq!(subtract(500.0, 320.5), 179.5);
        assert_eq!(subtract(100.0, 150.75), -50.75);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(320.5, 500.0), 64.1);
        assert_eq!(percentage(1.0, 3.0), 33.33);
        assert_eq!(percentage(2.0, 3.0), 66.67);
        assert_eq!(percentage(150.0, 100.0), 150.0);
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(250.0, 0.0), 0.0);
    }
}
