//! Hill Climbing.
//!
//! Deterministic local refinement around a starting candidate. Probes one
//! step above and one step below the current point, moves only on strict
//! improvement, and shrinks the step when neither side improves. Used to
//! polish the best point of each annealing round.

mod config;
mod runner;

pub use config::HillConfig;
pub use runner::{HillClimbResult, HillClimbStep, HillClimber};
