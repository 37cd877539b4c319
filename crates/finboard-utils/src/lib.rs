//! Decimal statistics and ratio helpers
//!
//! All helpers return zero on empty input or when the result would not fit
//! in a `Decimal`, so callers can feed them a ledger column of any length
//! and magnitude.

use rust_decimal::prelude::*;
use rust_decimal::MathematicalOps;

/// Sum of all values (0 on overflow)
pub fn sum(values: &[Decimal]) -> Decimal {
    checked_sum(values.iter().copied()).unwrap_or(Decimal::ZERO)
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Smallest value (0 for an empty slice)
pub fn min(values: &[Decimal]) -> Decimal {
    values.iter().copied().min().unwrap_or(Decimal::ZERO)
}

/// Largest value (0 for an empty slice)
pub fn max(values: &[Decimal]) -> Decimal {
    values.iter().copied().max().unwrap_or(Decimal::ZERO)
}

/// Arithmetic mean (0 for an empty slice)
pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(values.len());
    checked_sum(values.iter().copied())
        .map(|total| total / n)
        // Dividing first keeps the running total in range
        .or_else(|| checked_sum(values.iter().map(|v| *v / n)))
        .unwrap_or(Decimal::ZERO)
}

/// Median; the mean of the two middle values for even lengths
pub fn median(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        mean(&sorted[mid - 1..=mid])
    } else {
        sorted[mid]
    }
}

/// Population standard deviation (divides by n)
pub fn population_std_dev(values: &[Decimal]) -> Decimal {
    std_dev_with_divisor(values, values.len())
}

/// Sample standard deviation (divides by n - 1); 0 below two values
pub fn sample_std_dev(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    std_dev_with_divisor(values, values.len() - 1)
}

// Deviations are divided by the largest one before squaring, then the root
// is scaled back, so squares stay within [0, 1].
fn std_dev_with_divisor(values: &[Decimal], divisor: usize) -> Decimal {
    if values.is_empty() || divisor == 0 {
        return Decimal::ZERO;
    }
    let avg = mean(values);
    let diffs: Option<Vec<Decimal>> = values.iter().map(|v| v.checked_sub(avg)).collect();
    let Some(diffs) = diffs else {
        return Decimal::ZERO;
    };

    let scale = diffs.iter().map(|d| d.abs()).max().unwrap_or(Decimal::ZERO);
    if scale.is_zero() {
        return Decimal::ZERO;
    }

    let squares: Decimal = diffs
        .iter()
        .map(|d| {
            let unit = *d / scale;
            unit * unit
        })
        .sum();
    let variance = squares / Decimal::from(divisor);
    variance
        .sqrt()
        .and_then(|root| root.checked_mul(scale))
        .unwrap_or(Decimal::ZERO)
}

/// `part / whole * 100`, or 0 when `whole` is 0
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    ratio(part, whole)
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}
