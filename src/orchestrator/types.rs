//! Orchestration states and outcomes.

use crate::objective::EvaluationResult;

/// Phases of one orchestration round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Choosing where the round's workers start.
    Seeding,
    /// Parallel annealing.
    Searching,
    /// Hill climbing on the pool's best.
    Refining,
    /// Extending the history and refitting the surrogate.
    Training,
    /// Terminal.
    Done,
}

/// Terminal result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOutcome {
    /// A zero-error candidate was found.
    Converged {
        best: EvaluationResult,
        round: usize,
    },
    /// The round budget ran out. `best` is `None` only if every round
    /// failed.
    Exhausted {
        best: Option<EvaluationResult>,
        rounds: usize,
    },
}

impl SearchOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, SearchOutcome::Converged { .. })
    }

    /// Best evaluation found, if any.
    pub fn best(&self) -> Option<&EvaluationResult> {
        match self {
            SearchOutcome::Converged { best, .. } => Some(best),
            SearchOutcome::Exhausted { best, .. } => best.as_ref(),
        }
    }
}
