//! Fixed-point helpers at the amount/weight boundary.
//!
//! Amounts are big integers; weights are `f64`. These two functions are the
//! only places where one is turned into the other, and both go through an
//! exact decimal intermediate instead of native float arithmetic on the
//! amount.

use num::{Integer, Zero};
use stakepay_types::{Amount, WEIGHT_DECIMAL_PLACES};

use crate::error::{EconError, EconResult};

fn pow10(exponent: u32) -> Amount {
    Amount::from(10u32).pow(exponent)
}

/// Exact decimal form of a non-negative float, as `numerator / 10^scale`.
///
/// Uses the shortest representation that round-trips to the same `f64`
/// (`0.6` becomes `6 / 10`, not the binary expansion `0.59999...`).
fn decimal_parts(value: f64) -> (Amount, u32) {
    let repr = value.abs().to_string();
    let mut numerator = Amount::zero();
    let mut scale = 0u32;
    let mut after_point = false;

    for c in repr.chars() {
        match c {
            '.' => after_point = true,
            d => {
                if let Some(digit) = d.to_digit(10) {
                    numerator = numerator * 10u32 + digit;
                    if after_point {
                        scale += 1;
                    }
                }
            }
        }
    }

    (numerator, scale)
}

/// `a / b` as a float, computed to [`WEIGHT_DECIMAL_PLACES`] decimals with
/// half-up rounding before narrowing.
///
/// Ratios smaller than the last kept decimal come back as `0.0`.
pub fn divide_as_number(a: &Amount, b: &Amount) -> EconResult<f64> {
    if b.is_zero() {
        return Err(EconError::DivisionByZero);
    }

    let scale = pow10(WEIGHT_DECIMAL_PLACES);
    let doubled_divisor = b * 2u32;
    let scaled = (a * &scale * 2u32 + b) / &doubled_divisor;
    let (integer, fraction) = scaled.div_rem(&scale);

    let fraction = fraction.to_string();
    let padding = "0".repeat(WEIGHT_DECIMAL_PLACES as usize - fraction.len());
    let literal = format!("{integer}.{padding}{fraction}");

    // Always a plain decimal literal, which f64 parsing accepts.
    Ok(literal.parse::<f64>().unwrap_or_default())
}

/// `round_half_up(amount * fraction)`.
///
/// `fraction` must be finite and non-negative. The product is computed
/// exactly on the decimal form of `fraction`.
pub fn multiply_by_number(amount: &Amount, fraction: f64) -> EconResult<Amount> {
    if !fraction.is_finite() || fraction < 0.0 {
        return Err(EconError::InvalidFraction { value: fraction });
    }

    let (numerator, scale) = decimal_parts(fraction);
    let denominator = pow10(scale);
    let doubled = amount * numerator * 2u32 + &denominator;
    Ok(doubled / (denominator * 2u32))
}
