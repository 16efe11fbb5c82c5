//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! Candidates are arbitrary-precision integers and errors can be far
//! outside the range of `f64`, so the Metropolis exponent is computed on
//! a scaled energy difference (see [`EnergyScaling`]).
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod runner;
mod types;

pub use config::{EnergyScaling, Perturbation, SaConfig};
pub use runner::{SaProgress, SaResult, SaRunner};
pub use types::SaStatus;
