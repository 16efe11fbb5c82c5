//! ECDSA nonce-consistency objective.
//!
//! For a trial nonce `k`, every signature `(r, s, z)` implies a private key
//! `d = (s·k − z) · r⁻¹ mod n`. If all signatures were produced with the
//! same nonce and key, the implied keys coincide exactly at the true nonce.
//! The error of a candidate is the sum of pairwise distances between the
//! implied keys, so it is zero exactly when they all agree.

use super::math::{mod_inverse, mod_sub, pairwise_abs_sum};
use super::types::{Domain, Objective};
use crate::error::{Result, SearchError};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// One ECDSA signature: `r`, `s` and the message hash `z`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureRecord {
    pub r: BigUint,
    pub s: BigUint,
    pub z: BigUint,
}

impl SignatureRecord {
    pub fn new(r: BigUint, s: BigUint, z: BigUint) -> Self {
        Self { r, s, z }
    }

    /// Parses hexadecimal `r`, `s`, `z` (an optional `0x` prefix is allowed).
    pub fn from_hex(r: &str, s: &str, z: &str) -> Result<Self> {
        Ok(Self {
            r: parse_hex("r", r)?,
            s: parse_hex("s", s)?,
            z: parse_hex("z", z)?,
        })
    }
}

fn parse_hex(field: &str, text: &str) -> Result<BigUint> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(SearchError::InvalidSignature(format!("{field} is empty")));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| {
        SearchError::InvalidSignature(format!("{field} is not hexadecimal: {trimmed:?}"))
    })
}

/// A fixed, ordered set of signatures over a group of order `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSet {
    order: BigUint,
    records: Vec<SignatureRecord>,
}

impl SignatureSet {
    /// Validates that every component is reduced modulo `order`.
    pub fn new(order: BigUint, records: Vec<SignatureRecord>) -> Result<Self> {
        if order < BigUint::from(3u32) {
            return Err(SearchError::config(format!(
                "curve order must be at least 3, got {order}"
            )));
        }
        if records.is_empty() {
            return Err(SearchError::InvalidSignature(
                "signature set is empty".into(),
            ));
        }
        for (i, sig) in records.iter().enumerate() {
            for (name, value) in [("r", &sig.r), ("s", &sig.s), ("z", &sig.z)] {
                if value >= &order {
                    return Err(SearchError::InvalidSignature(format!(
                        "signature {i}: {name} is not reduced modulo the curve order"
                    )));
                }
            }
        }
        Ok(Self { order, records })
    }

    /// Signatures over secp256k1.
    pub fn secp256k1(records: Vec<SignatureRecord>) -> Result<Self> {
        Self::new(super::math::secp256k1_order(), records)
    }

    pub fn order(&self) -> &BigUint {
        &self.order
    }

    pub fn records(&self) -> &[SignatureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Nonce-consistency objective over a [`SignatureSet`].
///
/// Signatures whose `r` has no inverse, or whose implied key falls outside
/// `(1, n)`, are skipped. With fewer than two usable signatures the error is
/// a fixed penalty of `C(m, 2)·(n − 1) + 1` for `m` signatures. Usable keys
/// differ by at most `n − 3`, so every real pairwise sum stays below it.
#[derive(Debug, Clone)]
pub struct NonceObjective {
    signatures: SignatureSet,
    r_inverses: Vec<Option<BigUint>>,
    domain: Domain,
    penalty: BigUint,
}

impl NonceObjective {
    pub fn new(signatures: SignatureSet) -> Result<Self> {
        let order = signatures.order().clone();
        let r_inverses = signatures
            .records()
            .iter()
            .map(|sig| mod_inverse(&sig.r, &order))
            .collect();
        let domain = Domain::nonzero_residues(&order)?;
        let penalty = degenerate_penalty(&order, signatures.len());
        Ok(Self {
            signatures,
            r_inverses,
            domain,
            penalty,
        })
    }

    /// Overrides the degenerate-candidate penalty.
    pub fn with_penalty(mut self, penalty: BigUint) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn penalty(&self) -> &BigUint {
        &self.penalty
    }

    pub fn signatures(&self) -> &SignatureSet {
        &self.signatures
    }

    /// Private key implied by signature `index` under nonce `k`, or `None`
    /// when `r` is not invertible or the key is not in `(1, n)`.
    pub fn derive_key(&self, index: usize, k: &BigUint) -> Option<BigUint> {
        let sig = self.signatures.records().get(index)?;
        let r_inv = self.r_inverses.get(index)?.as_ref()?;
        let n = self.signatures.order();
        let sk = (&sig.s * k) % n;
        let d = (mod_sub(&sk, &sig.z, n) * r_inv) % n;
        (d > BigUint::one()).then_some(d)
    }

    /// Implied keys for every signature, in dataset order.
    pub fn derive_keys(&self, k: &BigUint) -> Vec<Option<BigUint>> {
        (0..self.signatures.len())
            .map(|i| self.derive_key(i, k))
            .collect()
    }

    /// The private key shared by every usable signature, if `k` makes them
    /// agree.
    pub fn recover_private_key(&self, k: &BigUint) -> Option<BigUint> {
        if !self.evaluate(k).is_zero() {
            return None;
        }
        self.derive_keys(k).into_iter().flatten().next()
    }
}

fn degenerate_penalty(order: &BigUint, signatures: usize) -> BigUint {
    let m = BigUint::from(signatures);
    let pairs = if m.is_zero() {
        BigUint::zero()
    } else {
        &m * (&m - 1u32) / 2u32
    };
    pairs * (order - 1u32) + 1u32
}

impl Objective for NonceObjective {
    fn evaluate(&self, candidate: &BigUint) -> BigUint {
        let mut keys: Vec<BigUint> = self.derive_keys(candidate).into_iter().flatten().collect();
        if keys.len() < 2 {
            return self.penalty.clone();
        }
        pairwise_abs_sum(&mut keys)
    }

    fn domain(&self) -> &Domain {
        &self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    /// Signs `z` with nonce `k` and key `d` over the toy group of order 17.
    fn toy_sig(r: u64, z: u64, k: u64, d: u64) -> SignatureRecord {
        let n = big(17);
        let k_inv = mod_inverse(&big(k), &n).unwrap();
        let s = (k_inv * (big(z) + big(r) * big(d))) % &n;
        SignatureRecord::new(big(r), s, big(z))
    }

    fn toy_objective() -> NonceObjective {
        let sigs = vec![toy_sig(3, 11, 5, 7), toy_sig(8, 2, 5, 7), toy_sig(13, 9, 5, 7)];
        NonceObjective::new(SignatureSet::new(big(17), sigs).unwrap()).unwrap()
    }

    #[test]
    fn test_true_nonce_has_zero_error() {
        let obj = toy_objective();
        assert!(obj.evaluate(&big(5)).is_zero());
        assert_eq!(obj.recover_private_key(&big(5)), Some(big(7)));
    }

    #[test]
    fn test_other_nonces_have_positive_error() {
        let obj = toy_objective();
        for k in (1..17).filter(|&k| k != 5) {
            assert!(!obj.evaluate(&big(k)).is_zero(), "k = {k}");
            assert!(obj.recover_private_key(&big(k)).is_none());
        }
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let obj = toy_objective();
        for k in 1..17 {
            assert_eq!(obj.evaluate(&big(k)), obj.evaluate(&big(k)));
        }
    }

    #[test]
    fn test_non_invertible_r_gets_penalty() {
        let sigs = vec![
            SignatureRecord::new(big(0), big(4), big(9)),
            SignatureRecord::new(big(6), big(3), big(1)),
        ];
        let obj = NonceObjective::new(SignatureSet::new(big(17), sigs).unwrap()).unwrap();
        for k in 1..17 {
            assert_eq!(&obj.evaluate(&big(k)), obj.penalty());
        }
        assert_eq!(obj.derive_key(0, &big(3)), None);
    }

    #[test]
    fn test_keys_outside_range_are_skipped() {
        let obj = toy_objective();
        // d = 0 or d = 1 are never reported as usable keys
        for k in 1..17 {
            for d in obj.derive_keys(&big(k)).into_iter().flatten() {
                assert!(d > big(1) && d < big(17));
            }
        }
    }

    #[test]
    fn test_penalty_exceeds_every_real_error() {
        // 16 signatures over n = 17: far more than sqrt(n)
        let sigs = (1..17u64)
            .map(|i| SignatureRecord::new(big(i), big(i), big(3)))
            .collect();
        let obj = NonceObjective::new(SignatureSet::new(big(17), sigs).unwrap()).unwrap();
        assert_eq!(obj.penalty(), &big(120 * 16 + 1));

        for k in 1..17 {
            let usable = obj.derive_keys(&big(k)).into_iter().flatten().count();
            let error = obj.evaluate(&big(k));
            if usable >= 2 {
                assert!(&error < obj.penalty(), "k = {k}, error = {error}");
            } else {
                assert_eq!(&error, obj.penalty());
            }
        }
    }

    #[test]
    fn test_custom_penalty() {
        let sigs = vec![SignatureRecord::new(big(3), big(4), big(5))];
        let obj = NonceObjective::new(SignatureSet::new(big(17), sigs).unwrap())
            .unwrap()
            .with_penalty(big(1_000));
        assert_eq!(obj.evaluate(&big(2)), big(1_000));
    }

    #[test]
    fn test_signature_set_rejects_unreduced() {
        let sigs = vec![SignatureRecord::new(big(17), big(1), big(1))];
        assert!(matches!(
            SignatureSet::new(big(17), sigs),
            Err(SearchError::InvalidSignature(_))
        ));
        assert!(SignatureSet::new(big(17), vec![]).is_err());
    }

    #[test]
    fn test_from_hex() {
        let sig = SignatureRecord::from_hex("0x1f", "FF", " 0a ").unwrap();
        assert_eq!(sig, SignatureRecord::new(big(31), big(255), big(10)));
        assert!(SignatureRecord::from_hex("zz", "1", "1").is_err());
        assert!(SignatureRecord::from_hex("", "1", "1").is_err());
    }
}
