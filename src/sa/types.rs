//! Annealer state machine.

/// Lifecycle of one annealing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SaStatus {
    /// Still iterating.
    Running,
    /// The current candidate reached zero error.
    Converged,
    /// Temperature fell below the minimum or the iteration budget ran out.
    Exhausted,
    /// Stopped through the cancellation flag.
    Cancelled,
}

impl SaStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SaStatus::Running)
    }
}
