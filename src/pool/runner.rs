//! Pool execution and reduction.

use super::config::PoolConfig;
use crate::error::Result;
use crate::events::{EventSink, SearchEvent};
use crate::objective::{EvaluationResult, Objective, SearchHistory};
use crate::random::rng_from;
use crate::sa::{SaConfig, SaProgress, SaResult, SaRunner, SaStatus};
use num_bigint::{BigInt, BigUint};
use rand::Rng;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// A worker that did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("worker {worker} failed: {message}")]
pub struct WorkerFailure {
    pub worker: usize,
    pub message: String,
}

/// Errors from a pool round.
#[derive(Debug, Clone, Error)]
pub enum PoolError {
    #[error("all {} workers failed", failures.len())]
    RoundFailure { failures: Vec<WorkerFailure> },
}

/// Summary of one successful worker.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub worker: usize,
    pub start: BigUint,
    pub best: EvaluationResult,
    pub status: SaStatus,
    pub iterations: usize,
    pub accepted_moves: usize,
    /// Length of the worker's history (iterations plus the start point).
    pub evaluations: usize,
}

/// Reduced output of one pool round.
#[derive(Debug, Clone)]
pub struct PoolResult {
    /// Minimum-error best over all successful workers (lowest index on ties).
    pub best: EvaluationResult,

    /// Index of the worker that produced `best`.
    pub best_worker: usize,

    /// Successful workers, in index order.
    pub workers: Vec<WorkerReport>,

    /// Workers excluded from the reduction.
    pub failures: Vec<WorkerFailure>,

    /// Worker histories concatenated in index order.
    pub history: SearchHistory,
}

impl PoolResult {
    pub fn converged(&self) -> bool {
        self.best.is_exact()
    }
}

/// Runs annealing workers in parallel and reduces their results.
pub struct WorkerPool {
    config: PoolConfig,
    anneal: SaConfig,
    threads: rayon::ThreadPool,
}

impl WorkerPool {
    /// Validates both configurations and builds one thread per worker.
    pub fn new(config: PoolConfig, anneal: SaConfig) -> Result<Self> {
        config.validate()?;
        anneal.validate()?;
        let threads = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_workers)
            .thread_name(|i| format!("anneal-worker-{i}"))
            .build()?;
        Ok(Self {
            config,
            anneal,
            threads,
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Runs one round.
    ///
    /// Without a `center` every worker starts at a uniform random point of
    /// the domain. With one, worker 0 starts at the center and the others
    /// are scattered within `seed_spread` of it.
    pub fn run<O: Objective + ?Sized>(
        &self,
        objective: &O,
        center: Option<&BigUint>,
        round: usize,
        sink: &dyn EventSink,
    ) -> std::result::Result<PoolResult, PoolError> {
        let starts = self.draw_starts(objective, center, round);
        let cancel = AtomicBool::new(false);

        let outcomes: Vec<std::result::Result<SaResult, WorkerFailure>> =
            self.threads.install(|| {
                starts
                    .par_iter()
                    .enumerate()
                    .map(|(worker, (start, seed))| {
                        self.run_worker(objective, worker, start, *seed, round, &cancel, sink)
                    })
                    .collect()
            });

        self.reduce(round, &starts, outcomes)
    }

    fn draw_starts<O: Objective + ?Sized>(
        &self,
        objective: &O,
        center: Option<&BigUint>,
        round: usize,
    ) -> Vec<(BigUint, u64)> {
        let domain = objective.domain();
        let mut rng = rng_from(self.config.seed.map(|s| round_seed(s, round)));
        (0..self.config.num_workers)
            .map(|worker| {
                let start = match (center, &self.config.seed_spread) {
                    (Some(c), _) if worker == 0 => domain.clamp(&BigInt::from(c.clone())),
                    (Some(c), Some(spread)) => domain.sample_around(&mut rng, c, spread),
                    _ => domain.sample(&mut rng),
                };
                (start, rng.random::<u64>())
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn run_worker<O: Objective + ?Sized>(
        &self,
        objective: &O,
        worker: usize,
        start: &BigUint,
        seed: u64,
        round: usize,
        cancel: &AtomicBool,
        sink: &dyn EventSink,
    ) -> std::result::Result<SaResult, WorkerFailure> {
        let config = self.anneal.clone().with_seed(seed);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut observer = |p: SaProgress<'_>| {
                sink.emit(&SearchEvent::AnnealProgress {
                    round,
                    worker,
                    iteration: p.iteration,
                    candidate: p.candidate.clone(),
                    error: p.error.clone(),
                    temperature: p.temperature,
                })
            };
            SaRunner::run_with_observer(objective, start, &config, Some(cancel), &mut observer)
        }));

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                return Err(WorkerFailure {
                    worker,
                    message: err.to_string(),
                })
            }
            Err(payload) => {
                return Err(WorkerFailure {
                    worker,
                    message: panic_message(payload),
                })
            }
        };

        if self.config.early_stop && result.status == SaStatus::Converged {
            tracing::debug!(round, worker, "worker converged, stopping siblings");
            cancel.store(true, Ordering::Relaxed);
        }
        Ok(result)
    }

    fn reduce(
        &self,
        round: usize,
        starts: &[(BigUint, u64)],
        outcomes: Vec<std::result::Result<SaResult, WorkerFailure>>,
    ) -> std::result::Result<PoolResult, PoolError> {
        let mut workers = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        let mut history = SearchHistory::new();
        let mut best: Option<(usize, EvaluationResult)> = None;

        for (worker, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(result) => {
                    tracing::debug!(
                        round,
                        worker,
                        status = ?result.status,
                        best_error = %result.best_error,
                        iterations = result.iterations,
                        "worker finished"
                    );
                    let worker_best = EvaluationResult::new(result.best, result.best_error);
                    if best
                        .as_ref()
                        .is_none_or(|(_, b)| worker_best.error < b.error)
                    {
                        best = Some((worker, worker_best.clone()));
                    }
                    workers.push(WorkerReport {
                        worker,
                        start: starts[worker].0.clone(),
                        best: worker_best,
                        status: result.status,
                        iterations: result.iterations,
                        accepted_moves: result.accepted_moves,
                        evaluations: result.history.len(),
                    });
                    history.extend(result.history);
                }
                Err(failure) => {
                    tracing::warn!(round, worker = failure.worker, "{failure}");
                    failures.push(failure);
                }
            }
        }

        let Some((best_worker, best)) = best else {
            return Err(PoolError::RoundFailure { failures });
        };

        Ok(PoolResult {
            best,
            best_worker,
            workers,
            failures,
            history,
        })
    }
}

/// Derives a per-round seed so rounds draw different but reproducible starts.
fn round_seed(seed: u64, round: usize) -> u64 {
    seed ^ (round as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullSink;
    use crate::objective::Domain;
    use crate::sa::Perturbation;
    use num_traits::Zero;

    struct Distance {
        target: BigUint,
        domain: Domain,
    }

    impl Distance {
        fn new(target: u64, high: u64) -> Self {
            Self {
                target: BigUint::from(target),
                domain: Domain::new(BigUint::from(1u32), BigUint::from(high)).unwrap(),
            }
        }
    }

    impl Objective for Distance {
        fn evaluate(&self, c: &BigUint) -> BigUint {
            if c >= &self.target {
                c - &self.target
            } else {
                &self.target - c
            }
        }

        fn domain(&self) -> &Domain {
            &self.domain
        }
    }

    /// Panics for candidates above a threshold.
    struct Fragile {
        threshold: BigUint,
        domain: Domain,
    }

    impl Objective for Fragile {
        fn evaluate(&self, c: &BigUint) -> BigUint {
            if c > &self.threshold {
                panic!("boom at {c}");
            }
            c.clone()
        }

        fn domain(&self) -> &Domain {
            &self.domain
        }
    }

    fn anneal() -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(1e-3)
            .with_alpha(0.99)
            .with_max_iterations(200)
            .with_perturbation(Perturbation::Fixed(3.0))
    }

    #[test]
    fn test_global_best_is_min_of_workers() {
        let problem = Distance::new(777, 1_000_000);
        let config = PoolConfig::default().with_num_workers(4).with_early_stop(false).with_seed(5);
        let pool = WorkerPool::new(config, anneal()).unwrap();

        let result = pool.run(&problem, None, 1, &NullSink).unwrap();

        assert_eq!(result.workers.len(), 4);
        let min = result.workers.iter().map(|w| &w.best.error).min().unwrap();
        assert_eq!(&result.best.error, min);
        assert_eq!(result.workers[result.best_worker].best, result.best);
    }

    #[test]
    fn test_history_concatenated_in_worker_order() {
        let problem = Distance::new(777, 1_000_000);
        let config = PoolConfig::default().with_num_workers(3).with_early_stop(false).with_seed(9);
        let pool = WorkerPool::new(config, anneal()).unwrap();

        let result = pool.run(&problem, None, 1, &NullSink).unwrap();

        let total: usize = result.workers.iter().map(|w| w.evaluations).sum();
        assert_eq!(result.history.len(), total);
        let mut offset = 0;
        for w in &result.workers {
            assert_eq!(result.history.entries()[offset].candidate, w.start);
            offset += w.evaluations;
        }
    }

    #[test]
    fn test_single_worker() {
        let problem = Distance::new(10, 50);
        let config = PoolConfig::default().with_num_workers(1).with_seed(3);
        let pool = WorkerPool::new(config, anneal()).unwrap();

        let result = pool.run(&problem, None, 1, &NullSink).unwrap();

        assert_eq!(result.workers.len(), 1);
        assert_eq!(result.best_worker, 0);
        assert_eq!(result.best, result.workers[0].best);
        assert_eq!(result.history.len(), result.workers[0].evaluations);
    }

    #[test]
    fn test_center_seeds_first_worker() {
        let problem = Distance::new(10, 1_000);
        let config = PoolConfig::default()
            .with_num_workers(3)
            .with_seed_spread(Some(BigUint::from(5u32)))
            .with_seed(1);
        let pool = WorkerPool::new(config, anneal()).unwrap();

        let center = BigUint::from(500u32);
        let result = pool.run(&problem, Some(&center), 1, &NullSink).unwrap();

        assert_eq!(result.workers[0].start, center);
        for w in &result.workers[1..] {
            assert!(w.start >= BigUint::from(495u32) && w.start <= BigUint::from(505u32));
        }
    }

    #[test]
    fn test_early_stop_on_convergence() {
        let problem = Distance::new(42, 1_000_000);
        let config = PoolConfig::default().with_num_workers(4).with_seed(2);
        let pool = WorkerPool::new(config, anneal().with_max_iterations(100_000).with_min_temperature(1e-300)).unwrap();

        let center = BigUint::from(42u32);
        let result = pool.run(&problem, Some(&center), 1, &NullSink).unwrap();

        assert!(result.converged());
        assert_eq!(result.best_worker, 0);
        assert_eq!(result.workers[0].status, SaStatus::Converged);
        assert!(result.best.error.is_zero());
    }

    #[test]
    fn test_panicking_worker_is_isolated() {
        let problem = Fragile {
            threshold: BigUint::from(1_000u32),
            domain: Domain::new(BigUint::from(1u32), BigUint::from(1_000_000u32)).unwrap(),
        };
        let config = PoolConfig::default()
            .with_num_workers(4)
            .with_seed_spread(Some(BigUint::from(1_000_000u32)))
            .with_seed(8);
        let pool = WorkerPool::new(config, anneal().with_max_iterations(20)).unwrap();

        let center = BigUint::from(50u32);
        let result = pool.run(&problem, Some(&center), 1, &NullSink).unwrap();

        assert_eq!(result.workers.len() + result.failures.len(), 4);
        assert_eq!(result.workers[0].worker, 0);
        for failure in &result.failures {
            assert!(failure.message.contains("boom"), "{}", failure.message);
        }
    }

    #[test]
    fn test_all_workers_failing_is_round_failure() {
        let problem = Fragile {
            threshold: BigUint::zero(),
            domain: Domain::new(BigUint::from(1u32), BigUint::from(100u32)).unwrap(),
        };
        let config = PoolConfig::default().with_num_workers(3).with_seed(4);
        let pool = WorkerPool::new(config, anneal()).unwrap();

        match pool.run(&problem, None, 1, &NullSink) {
            Err(PoolError::RoundFailure { failures }) => assert_eq!(failures.len(), 3),
            Ok(_) => panic!("expected round failure"),
        }
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(WorkerPool::new(PoolConfig::default().with_num_workers(0), anneal()).is_err());
        assert!(WorkerPool::new(PoolConfig::default(), anneal().with_alpha(2.0)).is_err());
    }

    #[test]
    fn test_rounds_draw_different_starts() {
        let problem = Distance::new(1, 1_000_000_000);
        let config = PoolConfig::default().with_num_workers(2).with_seed(11);
        let pool = WorkerPool::new(config, anneal().with_max_iterations(1)).unwrap();

        let first = pool.run(&problem, None, 1, &NullSink).unwrap();
        let second = pool.run(&problem, None, 2, &NullSink).unwrap();
        let again = pool.run(&problem, None, 1, &NullSink).unwrap();

        assert_ne!(first.workers[0].start, second.workers[0].start);
        assert_eq!(first.workers[0].start, again.workers[0].start);
    }
}
