//! Core objective trait, candidate domain and evaluation history.

use crate::error::{Result, SearchError};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use rand::Rng;
use std::sync::Arc;

/// A scalar objective to be minimized.
///
/// Implementations must be deterministic: the same candidate always
/// yields the same error. An error of zero is a perfect match and stops
/// the search.
pub trait Objective: Send + Sync {
    /// Computes the error of a candidate. Lower is better.
    fn evaluate(&self, candidate: &BigUint) -> BigUint;

    /// The inclusive range candidates are drawn from.
    fn domain(&self) -> &Domain;
}

impl<O: Objective + ?Sized> Objective for &O {
    fn evaluate(&self, candidate: &BigUint) -> BigUint {
        (**self).evaluate(candidate)
    }

    fn domain(&self) -> &Domain {
        (**self).domain()
    }
}

impl<O: Objective + ?Sized> Objective for Arc<O> {
    fn evaluate(&self, candidate: &BigUint) -> BigUint {
        (**self).evaluate(candidate)
    }

    fn domain(&self) -> &Domain {
        (**self).domain()
    }
}

/// Inclusive candidate range `[low, high]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Domain {
    low: BigUint,
    high: BigUint,
}

impl Domain {
    pub fn new(low: BigUint, high: BigUint) -> Result<Self> {
        if low > high {
            return Err(SearchError::config(format!(
                "domain low bound {low} exceeds high bound {high}"
            )));
        }
        Ok(Self { low, high })
    }

    /// The non-zero residues `[1, n - 1]` of a modulus `n >= 3`.
    pub fn nonzero_residues(order: &BigUint) -> Result<Self> {
        if order < &BigUint::from(3u32) {
            return Err(SearchError::config(format!(
                "curve order must be at least 3, got {order}"
            )));
        }
        Self::new(BigUint::from(1u32), order - 1u32)
    }

    pub fn low(&self) -> &BigUint {
        &self.low
    }

    pub fn high(&self) -> &BigUint {
        &self.high
    }

    /// Number of points in the domain.
    pub fn size(&self) -> BigUint {
        &self.high - &self.low + 1u32
    }

    pub fn contains(&self, candidate: &BigUint) -> bool {
        candidate >= &self.low && candidate <= &self.high
    }

    /// Nearest domain point to a signed value.
    pub fn clamp(&self, value: &BigInt) -> BigUint {
        match value.to_biguint() {
            Some(v) if v < self.low => self.low.clone(),
            Some(v) if v > self.high => self.high.clone(),
            Some(v) => v,
            None => self.low.clone(),
        }
    }

    /// `candidate + delta`, clamped into the domain.
    pub fn offset_clamped(&self, candidate: &BigUint, delta: &BigInt) -> BigUint {
        let moved = BigInt::from_biguint(Sign::Plus, candidate.clone()) + delta;
        self.clamp(&moved)
    }

    /// Uniform random point of the domain.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BigUint {
        crate::random::uniform_inclusive(rng, &self.low, &self.high)
    }

    /// Uniform random point of `[center - radius, center + radius]`
    /// intersected with the domain.
    pub fn sample_around<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        center: &BigUint,
        radius: &BigUint,
    ) -> BigUint {
        let low = if center > radius {
            (center - radius).max(self.low.clone())
        } else {
            self.low.clone()
        };
        let high = (center + radius).min(self.high.clone());
        if low > high {
            return self.sample(rng);
        }
        crate::random::uniform_inclusive(rng, &low, &high)
    }
}

/// A candidate paired with its error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvaluationResult {
    pub candidate: BigUint,
    pub error: BigUint,
}

impl EvaluationResult {
    pub fn new(candidate: BigUint, error: BigUint) -> Self {
        Self { candidate, error }
    }

    pub fn is_exact(&self) -> bool {
        self.error.is_zero()
    }
}

/// Ordered sequence of evaluations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchHistory {
    entries: Vec<EvaluationResult>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: EvaluationResult) {
        self.entries.push(entry);
    }

    pub fn record(&mut self, candidate: BigUint, error: BigUint) {
        self.entries.push(EvaluationResult { candidate, error });
    }

    /// Appends every entry of `other`, preserving its order.
    pub fn extend(&mut self, other: SearchHistory) {
        self.entries.extend(other.entries);
    }

    /// Drops every other entry, oldest kept first, until at most `limit`
    /// remain. Older evaluations end up sparser than recent ones.
    pub fn thin_to(&mut self, limit: usize) {
        if limit == 0 {
            self.entries.clear();
            return;
        }
        while self.entries.len() > limit {
            let mut index = 0usize;
            self.entries.retain(|_| {
                index += 1;
                index % 2 == 1
            });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[EvaluationResult] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvaluationResult> {
        self.entries.iter()
    }

    /// Lowest-error entry; the earliest one wins ties.
    pub fn best(&self) -> Option<&EvaluationResult> {
        self.entries.iter().reduce(|best, e| if e.error < best.error { e } else { best })
    }

    /// First entry with zero error.
    pub fn find_exact(&self) -> Option<&EvaluationResult> {
        self.entries.iter().find(|e| e.is_exact())
    }
}

impl<'a> IntoIterator for &'a SearchHistory {
    type Item = &'a EvaluationResult;
    type IntoIter = std::slice::Iter<'a, EvaluationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
