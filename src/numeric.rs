//! Conversions between arbitrary-precision integers and `f64`.
//!
//! Errors and candidates routinely exceed 2^256, so every conversion here
//! saturates instead of failing and logarithms are computed from the bit
//! length when the value does not fit in a double.

use num_bigint::{BigInt, BigUint};
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use std::f64::consts::LN_2;

/// Largest exponent for which `f64::exp` stays finite, with some headroom.
const MAX_DIRECT_EXP: f64 = 700.0;

/// Lossy conversion to `f64`; saturates to infinity.
pub fn to_f64(value: &BigUint) -> f64 {
    value.to_f64().unwrap_or(f64::INFINITY)
}

/// Natural logarithm of an arbitrary-precision integer.
///
/// Returns negative infinity for zero.
pub fn ln(value: &BigUint) -> f64 {
    if value.is_zero() {
        return f64::NEG_INFINITY;
    }
    let bits = value.bits();
    if bits <= 1000 {
        return to_f64(value).ln();
    }
    let shift = bits - 64;
    to_f64(&(value >> shift)).ln() + shift as f64 * LN_2
}

/// Inverse of [`ln`]: the integer nearest to `e^y`.
///
/// Returns `None` for non-finite input.
pub fn exp(y: f64) -> Option<BigUint> {
    if !y.is_finite() {
        return None;
    }
    if y <= MAX_DIRECT_EXP {
        return BigUint::from_f64(y.exp().round());
    }
    let shift = ((y - MAX_DIRECT_EXP) / LN_2).ceil();
    let mantissa = BigUint::from_f64((y - shift * LN_2).exp().round())?;
    Some(mantissa << (shift as u64))
}

/// Rounds a finite `f64` to the nearest signed big integer.
pub fn round_to_bigint(value: f64) -> Option<BigInt> {
    if !value.is_finite() {
        return None;
    }
    BigInt::from_f64(value.round())
}
