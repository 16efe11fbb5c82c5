//! Hill climbing execution loop.

use super::config::HillConfig;
use crate::error::Result;
use crate::objective::Objective;
use num_bigint::BigUint;
use num_traits::Zero;

/// Result of a hill climbing run.
#[derive(Debug, Clone)]
pub struct HillClimbResult {
    /// Best candidate reached.
    pub best: BigUint,

    /// Error of the best candidate.
    pub best_error: BigUint,

    /// Probe iterations executed.
    pub iterations: usize,

    /// Step size when the climb stopped.
    pub final_step: BigUint,

    /// Error after each accepted move, starting with the start error.
    /// Strictly decreasing.
    pub error_history: Vec<BigUint>,
}

/// An accepted move, reported to observers.
#[derive(Debug, Clone, Copy)]
pub struct HillClimbStep<'a> {
    pub iteration: usize,
    pub candidate: &'a BigUint,
    pub error: &'a BigUint,
    pub step: &'a BigUint,
}

/// Executes hill climbing.
pub struct HillClimber;

impl HillClimber {
    /// Refines `start` until the step shrinks below `min_step`, the
    /// iteration budget runs out, or the error reaches zero.
    pub fn run<O: Objective + ?Sized>(
        objective: &O,
        start: &BigUint,
        config: &HillConfig,
    ) -> Result<HillClimbResult> {
        Self::run_with_observer(objective, start, config, &mut |_| {})
    }

    /// Like [`run`](Self::run), reporting every accepted move.
    pub fn run_with_observer<O: Objective + ?Sized>(
        objective: &O,
        start: &BigUint,
        config: &HillConfig,
        observer: &mut dyn FnMut(HillClimbStep<'_>),
    ) -> Result<HillClimbResult> {
        config.validate()?;
        let domain = objective.domain();

        let mut current = domain.clamp(&start.clone().into());
        let mut current_error = objective.evaluate(&current);
        let mut step = config.step_init.clone();
        let mut error_history = vec![current_error.clone()];
        let mut iterations = 0usize;

        while step >= config.min_step && iterations < config.max_iterations && !current_error.is_zero()
        {
            let up = &current + &step;
            let down = (current >= step).then(|| &current - &step);

            let mut moved = false;
            for next in std::iter::once(up).chain(down) {
                // Out-of-domain probes count as no improvement
                if !domain.contains(&next) {
                    continue;
                }
                let next_error = objective.evaluate(&next);
                if next_error < current_error {
                    current = next;
                    current_error = next_error;
                    moved = true;
                    break;
                }
            }

            iterations += 1;

            if moved {
                error_history.push(current_error.clone());
                observer(HillClimbStep {
                    iteration: iterations,
                    candidate: &current,
                    error: &current_error,
                    step: &step,
                });
            } else {
                step /= config.shrink_factor;
            }
        }

        Ok(HillClimbResult {
            best: current,
            best_error: current_error,
            iterations,
            final_step: step,
            error_history,
        })
    }
}
