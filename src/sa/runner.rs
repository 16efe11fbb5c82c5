//! SA execution loop.

use super::config::{EnergyScaling, SaConfig};
use super::types::SaStatus;
use crate::error::Result;
use crate::numeric::{round_to_bigint, to_f64};
use crate::objective::{Objective, SearchHistory};
use crate::random::rng_from;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Upper bound on the history preallocated for one run.
const HISTORY_PREALLOC: usize = 1 << 16;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// The best candidate found.
    pub best: BigUint,

    /// Error of the best candidate. Never worse than the start.
    pub best_error: BigUint,

    /// Terminal state of the run.
    pub status: SaStatus,

    /// Total number of proposals evaluated.
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Every evaluation of the run, starting with the start candidate.
    pub history: SearchHistory,
}

/// Periodic snapshot of a running annealer.
#[derive(Debug, Clone, Copy)]
pub struct SaProgress<'a> {
    pub iteration: usize,
    pub candidate: &'a BigUint,
    pub error: &'a BigUint,
    pub temperature: f64,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from `start`.
    pub fn run<O: Objective + ?Sized>(
        objective: &O,
        start: &BigUint,
        config: &SaConfig,
    ) -> Result<SaResult> {
        Self::run_with_observer(objective, start, config, None, &mut |_| {})
    }

    /// Runs SA with an optional cancellation token.
    pub fn run_with_cancel<O: Objective + ?Sized>(
        objective: &O,
        start: &BigUint,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult> {
        Self::run_with_observer(objective, start, config, cancel.as_deref(), &mut |_| {})
    }

    /// Runs SA, reporting a [`SaProgress`] every `progress_interval`
    /// iterations. The cancellation flag is checked before each proposal.
    pub fn run_with_observer<O: Objective + ?Sized>(
        objective: &O,
        start: &BigUint,
        config: &SaConfig,
        cancel: Option<&AtomicBool>,
        observer: &mut dyn FnMut(SaProgress<'_>),
    ) -> Result<SaResult> {
        config.validate()?;

        let mut rng = rng_from(config.seed);
        let domain = objective.domain();

        // Initialize
        let mut current = domain.clamp(&BigInt::from(start.clone()));
        let mut current_error = objective.evaluate(&current);
        let mut best = current.clone();
        let mut best_error = current_error.clone();

        // Cooling usually ends the run long before max_iterations
        let prealloc = config.max_iterations.min(HISTORY_PREALLOC) + 1;
        let mut history = SearchHistory::with_capacity(prealloc);
        history.record(current.clone(), current_error.clone());

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        let mut status = if current_error.is_zero() {
            SaStatus::Converged
        } else {
            SaStatus::Running
        };

        while !status.is_terminal() {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                status = SaStatus::Cancelled;
                break;
            }

            let delta = gaussian_step(&mut rng, config.perturbation.sigma(temperature));
            let candidate = domain.offset_clamped(&current, &delta);
            let candidate_error = objective.evaluate(&candidate);
            history.record(candidate.clone(), candidate_error.clone());

            // Metropolis acceptance criterion
            let accept = if candidate_error < current_error {
                improving_moves += 1;
                true
            } else {
                let worsening = &candidate_error - &current_error;
                let probability =
                    acceptance_probability(&worsening, &current_error, temperature, config);
                probability > 0.0 && rng.random_range(0.0..1.0) < probability
            };

            if accept {
                current = candidate;
                current_error = candidate_error;
                accepted_moves += 1;

                if current_error < best_error {
                    best = current.clone();
                    best_error = current_error.clone();
                }
            }

            iterations += 1;
            temperature *= config.alpha;

            if config.progress_interval > 0 && iterations % config.progress_interval == 0 {
                observer(SaProgress {
                    iteration: iterations,
                    candidate: &current,
                    error: &current_error,
                    temperature,
                });
            }

            status = if current_error.is_zero() {
                SaStatus::Converged
            } else if temperature < config.min_temperature || iterations >= config.max_iterations {
                SaStatus::Exhausted
            } else {
                SaStatus::Running
            };
        }

        Ok(SaResult {
            best,
            best_error,
            status,
            iterations,
            accepted_moves,
            improving_moves,
            final_temperature: temperature,
            history,
        })
    }
}

/// Rounded Gaussian step with standard deviation `sigma`; zero when the
/// distribution cannot be built or the sample is not finite.
fn gaussian_step<R: Rng + ?Sized>(rng: &mut R, sigma: f64) -> BigInt {
    Normal::new(0.0, sigma)
        .ok()
        .and_then(|normal| round_to_bigint(normal.sample(rng)))
        .unwrap_or_default()
}

/// Metropolis probability of accepting a move that worsens the error by
/// `worsening` from `current_error` at `temperature`.
///
/// Always in `[0, 1]`; never NaN.
fn acceptance_probability(
    worsening: &BigUint,
    current_error: &BigUint,
    temperature: f64,
    config: &SaConfig,
) -> f64 {
    let (energy, temp) = match config.energy_scaling {
        EnergyScaling::Relative => {
            let reference = to_f64(current_error).max(1.0);
            (
                to_f64(worsening) / reference,
                temperature / config.initial_temperature,
            )
        }
        EnergyScaling::Fixed(scale) => (to_f64(worsening) / scale, temperature),
    };
    let exponent = -energy / temp;
    if temp.is_nan() || temp <= 0.0 || exponent.is_nan() {
        return 0.0;
    }
    exponent.exp().clamp(0.0, 1.0)
}
