//! Seeded random number generation and uniform big-integer sampling.

use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a reproducible RNG from a 64-bit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from `seed`, or from OS entropy when `None`.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    create_rng(seed.unwrap_or_else(rand::random))
}

/// Draws a uniform integer in `[0, bound)` by rejection sampling.
///
/// Returns zero when `bound` is zero.
pub fn uniform_below<R: Rng + ?Sized>(rng: &mut R, bound: &BigUint) -> BigUint {
    if bound.is_zero() {
        return BigUint::zero();
    }
    let bits = bound.bits();
    let len = bits.div_ceil(8) as usize;
    let top_mask = match bits % 8 {
        0 => 0xFF,
        rem => (1u8 << rem) - 1,
    };
    let mut bytes = vec![0u8; len];
    loop {
        rng.fill(bytes.as_mut_slice());
        if let Some(top) = bytes.last_mut() {
            *top &= top_mask;
        }
        let value = BigUint::from_bytes_le(&bytes);
        if &value < bound {
            return value;
        }
    }
}

/// Draws a uniform integer in the inclusive range `[low, high]`.
///
/// Returns `low` if the range is empty or a single point.
pub fn uniform_inclusive<R: Rng + ?Sized>(rng: &mut R, low: &BigUint, high: &BigUint) -> BigUint {
    if high <= low {
        return low.clone();
    }
    let span = high - low + 1u32;
    low + uniform_below(rng, &span)
}
