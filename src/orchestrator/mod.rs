//! Surrogate-guided search loop.
//!
//! Each round runs the parallel annealing pool, polishes the pool's best
//! point with hill climbing, then retrains the surrogate on the cumulative
//! history to choose where the next round starts. The loop ends on a
//! perfect match or when the round budget is spent.

mod config;
mod runner;
mod types;

pub use config::SearchConfig;
pub use runner::Orchestrator;
pub use types::{Phase, SearchOutcome};
