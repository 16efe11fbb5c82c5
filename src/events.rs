//! Progress events and the sinks that receive them.
//!
//! Workers emit events from their own threads, so every sink must be
//! `Send + Sync`. Emission never blocks the search on a slow consumer
//! except through the sink's own implementation.

use crossbeam_channel::Sender;
use num_bigint::BigUint;

/// An observable step of the search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Periodic snapshot from one annealing worker.
    AnnealProgress {
        round: usize,
        worker: usize,
        iteration: usize,
        candidate: BigUint,
        error: BigUint,
        temperature: f64,
    },
    /// An accepted hill-climbing move.
    HillClimbStep {
        round: usize,
        iteration: usize,
        candidate: BigUint,
        error: BigUint,
        step: BigUint,
    },
    /// Best (refined) result of a round.
    RoundCompleted {
        round: usize,
        candidate: BigUint,
        error: BigUint,
    },
    /// Every worker of the round failed.
    RoundFailed { round: usize, failures: usize },
    /// Terminal event.
    Finished {
        rounds: usize,
        converged: bool,
        candidate: Option<BigUint>,
        error: Option<BigUint>,
    },
}

/// Receives search events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &SearchEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &SearchEvent) {}
}

/// Forwards events to `tracing`: per-iteration events at `trace`, hill
/// climbing at `debug`, round-level events at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &SearchEvent) {
        match event {
            SearchEvent::AnnealProgress {
                round,
                worker,
                iteration,
                candidate,
                error,
                temperature,
            } => tracing::trace!(
                round,
                worker,
                iteration,
                %candidate,
                %error,
                temperature,
                "anneal progress"
            ),
            SearchEvent::HillClimbStep {
                round,
                iteration,
                candidate,
                error,
                step,
            } => tracing::debug!(round, iteration, %candidate, %error, %step, "hill climb step"),
            SearchEvent::RoundCompleted {
                round,
                candidate,
                error,
            } => tracing::info!(round, %candidate, %error, "round completed"),
            SearchEvent::RoundFailed { round, failures } => {
                tracing::warn!(round, failures, "all workers failed")
            }
            SearchEvent::Finished {
                rounds, converged, ..
            } => tracing::info!(rounds, converged, "search finished"),
        }
    }
}

/// Adapts a closure into an [`EventSink`].
pub struct FnSink<F>(pub F);

impl<F> EventSink for FnSink<F>
where
    F: Fn(&SearchEvent) + Send + Sync,
{
    fn emit(&self, event: &SearchEvent) {
        (self.0)(event)
    }
}

/// Sends a clone of every event down a channel. A disconnected receiver
/// is ignored.
impl EventSink for Sender<SearchEvent> {
    fn emit(&self, event: &SearchEvent) {
        let _ = self.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn round_event(round: usize) -> SearchEvent {
        SearchEvent::RoundCompleted {
            round,
            candidate: BigUint::from(5u32),
            error: BigUint::from(0u32),
        }
    }

    #[test]
    fn test_fn_sink_receives_events() {
        let seen = Mutex::new(Vec::new());
        let sink = FnSink(|e: &SearchEvent| seen.lock().unwrap().push(e.clone()));
        sink.emit(&round_event(1));
        sink.emit(&round_event(2));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_channel_sink() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.emit(&round_event(3));
        assert_eq!(rx.try_recv().unwrap(), round_event(3));
    }

    #[test]
    fn test_channel_sink_disconnected_is_silent() {
        let (tx, rx) = crossbeam_channel::unbounded::<SearchEvent>();
        drop(rx);
        tx.emit(&round_event(1));
    }
}
