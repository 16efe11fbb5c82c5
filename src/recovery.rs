//! End-to-end nonce recovery for a signature set.

use crate::error::Result;
use crate::events::EventSink;
use crate::objective::{CachedObjective, NonceObjective, Objective, SignatureSet};
use crate::orchestrator::{Orchestrator, SearchConfig, SearchOutcome};
use crate::surrogate::{Regressor, StumpBoostRegressor};
use num_bigint::BigUint;
use std::sync::Arc;

/// Evaluations memoized by [`NonceSearch`] unless overridden.
pub const DEFAULT_CACHE_CAPACITY: usize = 1 << 18;

/// Result of a recovery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecoveryReport {
    /// The shared nonce and the private key it implies.
    Success {
        nonce: BigUint,
        private_key: BigUint,
        round: usize,
    },
    /// No zero-error nonce was found within the round budget.
    Exhausted {
        best_candidate: Option<BigUint>,
        best_error: Option<BigUint>,
        rounds: usize,
    },
}

impl RecoveryReport {
    pub fn is_success(&self) -> bool {
        matches!(self, RecoveryReport::Success { .. })
    }

    pub fn private_key(&self) -> Option<&BigUint> {
        match self {
            RecoveryReport::Success { private_key, .. } => Some(private_key),
            RecoveryReport::Exhausted { .. } => None,
        }
    }
}

/// Searches for the nonce shared by every signature of a [`SignatureSet`].
///
/// Evaluations are memoized across rounds and workers, up to
/// [`DEFAULT_CACHE_CAPACITY`] entries unless
/// [`with_cache_capacity`](Self::with_cache_capacity) says otherwise.
pub struct NonceSearch<R: Regressor = StumpBoostRegressor> {
    objective: CachedObjective<NonceObjective>,
    orchestrator: Orchestrator<R>,
}

fn cached(signatures: SignatureSet) -> Result<CachedObjective<NonceObjective>> {
    let objective = NonceObjective::new(signatures)?;
    Ok(CachedObjective::new(objective).with_capacity_limit(DEFAULT_CACHE_CAPACITY))
}

impl NonceSearch<StumpBoostRegressor> {
    pub fn new(signatures: SignatureSet, config: SearchConfig) -> Result<Self> {
        Ok(Self {
            objective: cached(signatures)?,
            orchestrator: Orchestrator::new(config)?,
        })
    }
}

impl<R: Regressor> NonceSearch<R> {
    /// Uses a prebuilt orchestrator, e.g. one with a custom regressor.
    pub fn with_orchestrator(signatures: SignatureSet, orchestrator: Orchestrator<R>) -> Result<Self> {
        Ok(Self {
            objective: cached(signatures)?,
            orchestrator,
        })
    }

    /// Bounds the evaluation cache.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.objective = self.objective.with_capacity_limit(capacity);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.orchestrator = self.orchestrator.with_sink(sink);
        self
    }

    pub fn objective(&self) -> &CachedObjective<NonceObjective> {
        &self.objective
    }

    pub fn run(&self) -> Result<RecoveryReport> {
        let outcome = self.orchestrator.run(&self.objective)?;
        let stats = self.objective.stats();
        tracing::debug!(
            hits = stats.hits,
            misses = stats.misses,
            entries = stats.entries,
            "evaluation cache"
        );

        Ok(match outcome {
            SearchOutcome::Converged { best, round } => {
                match self.objective.inner().recover_private_key(&best.candidate) {
                    Some(private_key) => RecoveryReport::Success {
                        nonce: best.candidate,
                        private_key,
                        round,
                    },
                    None => {
                        tracing::warn!(round, "zero-error candidate implies no usable key");
                        RecoveryReport::Exhausted {
                            best_error: Some(self.objective.evaluate(&best.candidate)),
                            best_candidate: Some(best.candidate),
                            rounds: round,
                        }
                    }
                }
            }
            SearchOutcome::Exhausted { best, rounds } => {
                let (best_candidate, best_error) = match best {
                    Some(b) => (Some(b.candidate), Some(b.error)),
                    None => (None, None),
                };
                RecoveryReport::Exhausted {
                    best_candidate,
                    best_error,
                    rounds,
                }
            }
        })
    }
}
