//! Modular arithmetic helpers.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Big-endian bytes of the secp256k1 group order.
const SECP256K1_ORDER_BE: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// The order `n` of the secp256k1 group.
pub fn secp256k1_order() -> BigUint {
    BigUint::from_bytes_be(&SECP256K1_ORDER_BE)
}

/// Multiplicative inverse of `a` modulo `n`, if it exists.
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    if n.is_zero() {
        return None;
    }
    let a = BigInt::from_biguint(Sign::Plus, a % n);
    if a.is_zero() {
        return None;
    }
    let modulus = BigInt::from_biguint(Sign::Plus, n.clone());
    let egcd = a.extended_gcd(&modulus);
    if !egcd.gcd.is_one() {
        return None;
    }
    egcd.x.mod_floor(&modulus).to_biguint()
}

/// `(a - b) mod n` without a negative intermediate.
pub fn mod_sub(a: &BigUint, b: &BigUint, n: &BigUint) -> BigUint {
    let a = a % n;
    let b = b % n;
    if a >= b {
        a - b
    } else {
        n - b + a
    }
}

/// Sum of `|v_i - v_j|` over all unordered pairs.
///
/// Sorts the values once and accumulates `j * v_j - (v_0 + ... + v_{j-1})`,
/// which is exact and linear after the sort.
pub fn pairwise_abs_sum(values: &mut [BigUint]) -> BigUint {
    values.sort_unstable();
    let mut prefix = BigUint::zero();
    let mut total = BigUint::zero();
    for (j, v) in values.iter().enumerate() {
        total += v * BigUint::from(j) - &prefix;
        prefix += v;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_secp256k1_order_hex() {
        assert_eq!(
            format!("{:X}", secp256k1_order()),
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"
        );
    }

    #[test]
    fn test_mod_inverse_small_prime() {
        for a in 1..17u64 {
            let inv = mod_inverse(&big(a), &big(17)).unwrap();
            assert_eq!((big(a) * inv) % big(17), big(1));
        }
    }

    #[test]
    fn test_mod_inverse_missing() {
        assert!(mod_inverse(&big(0), &big(17)).is_none());
        assert!(mod_inverse(&big(17), &big(17)).is_none());
        assert!(mod_inverse(&big(6), &big(15)).is_none());
    }

    #[test]
    fn test_mod_inverse_secp256k1() {
        let n = secp256k1_order();
        let a = &n - 12345u32;
        let inv = mod_inverse(&a, &n).unwrap();
        assert_eq!((a * inv) % &n, big(1));
    }

    #[test]
    fn test_mod_sub_wraps() {
        assert_eq!(mod_sub(&big(3), &big(5), &big(17)), big(15));
        assert_eq!(mod_sub(&big(5), &big(3), &big(17)), big(2));
        assert_eq!(mod_sub(&big(20), &big(3), &big(17)), big(0));
    }

    #[test]
    fn test_pairwise_abs_sum_matches_naive() {
        let raw = [9u64, 2, 14, 2, 7];
        let mut naive = 0u64;
        for i in 0..raw.len() {
            for j in (i + 1)..raw.len() {
                naive += raw[i].abs_diff(raw[j]);
            }
        }
        let mut values: Vec<BigUint> = raw.iter().map(|&v| big(v)).collect();
        assert_eq!(pairwise_abs_sum(&mut values), big(naive));
    }

    #[test]
    fn test_pairwise_abs_sum_equal_values() {
        let mut values = vec![big(4), big(4), big(4)];
        assert!(pairwise_abs_sum(&mut values).is_zero());
    }
}
