//! Concurrent memoization of objective evaluations.

use super::types::{Domain, Objective};
use dashmap::DashMap;
use num_bigint::BigUint;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hit/miss counters of a [`CachedObjective`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Wraps an objective with a candidate-keyed cache shared by all workers.
///
/// Entries are never invalidated: the wrapped objective is deterministic
/// and its dataset is fixed. With a capacity set, results computed after
/// the cache is full are returned but not stored.
#[derive(Debug)]
pub struct CachedObjective<O> {
    inner: O,
    cache: DashMap<BigUint, BigUint>,
    capacity: Option<usize>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<O: Objective> CachedObjective<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
            capacity: None,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Bounds the number of stored entries.
    pub fn with_capacity_limit(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.len(),
        }
    }
}

impl<O: Objective> Objective for CachedObjective<O> {
    fn evaluate(&self, candidate: &BigUint) -> BigUint {
        if let Some(hit) = self.cache.get(candidate) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.value().clone();
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let error = self.inner.evaluate(candidate);
        if self.capacity.is_none_or(|cap| self.cache.len() < cap) {
            self.cache.insert(candidate.clone(), error.clone());
        }
        error
    }

    fn domain(&self) -> &Domain {
        self.inner.domain()
    }
}
