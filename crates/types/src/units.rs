//! Balance units and output-boundary rendering.
//!
//! Internally every balance, delta, and contribution is exact: `Wei` is an
//! unbounded signed integer and `Contribution` an exact rational. Conversion
//! to decimal strings or to the human-readable display unit happens only at
//! the output boundary, never inside the allocation pipeline.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{Signed, Zero};

/// Smallest on-chain balance unit; signed because per-block deltas can be
/// negative.
pub type Wei = BigInt;

/// A participant's exact share of pool growth, in wei.
pub type Contribution = BigRational;

/// Decimal places between wei and the display unit (10^18 wei per unit).
pub const DISPLAY_DECIMALS: u32 = 18;

/// 10^18, the wei-per-display-unit scale factor.
pub fn wei_per_display_unit() -> BigUint {
    BigUint::from(10u8).pow(DISPLAY_DECIMALS)
}

/// Scale a wei-denominated value down to the display unit.
pub fn from_wei(value: &Contribution) -> Contribution {
    value / BigRational::from_integer(BigInt::from(wei_per_display_unit()))
}

/// Render an exact rational as a decimal string.
///
/// Truncates toward zero after `max_decimals` fractional digits and trims
/// trailing zeros, so a given value has exactly one rendering. This is the
/// only place precision is ever discarded.
pub fn to_decimal_string(value: &Contribution, max_decimals: u32) -> String {
    if value.is_zero() {
        return "0".to_string();
    }

    let sign = if value.is_negative() { "-" } else { "" };
    let numer = value.numer().magnitude().clone();
    let denom = value.denom().magnitude().clone();

    let integer = &numer / &denom;
    let remainder = &numer % &denom;

    if remainder.is_zero() {
        return format!("{sign}{integer}");
    }

    let scaled = remainder * BigUint::from(10u8).pow(max_decimals) / &denom;
    let mut fraction = format!("{:0>width$}", scaled, width = max_decimals as usize);
    while fraction.ends_with('0') {
        fraction.pop();
    }

    if fraction.is_empty() {
        // Truncated to nothing: a magnitude below 10^-max_decimals.
        if integer.is_zero() {
            "0".to_string()
        } else {
            format!("{sign}{integer}")
        }
    } else {
        format!("{sign}{integer}.{fraction}")
    }
}

/// Render a wei-denominated value in the display unit.
pub fn display_units(value: &Contribution) -> String {
    to_decimal_string(&from_wei(value), DISPLAY_DECIMALS)
}
