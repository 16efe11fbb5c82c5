//! Orchestration loop.

use super::config::SearchConfig;
use super::types::{Phase, SearchOutcome};
use crate::error::Result;
use crate::events::{EventSink, SearchEvent, TracingSink};
use crate::hill::{HillClimbStep, HillClimber};
use crate::objective::{EvaluationResult, Objective, SearchHistory};
use crate::pool::{PoolError, WorkerPool};
use crate::random::rng_from;
use crate::surrogate::{Regressor, StumpBoostRegressor, SurrogateTrainer};
use num_bigint::BigUint;
use std::sync::Arc;

/// Runs rounds of parallel annealing, hill-climbing refinement and
/// surrogate-guided reseeding.
///
/// # Examples
///
/// ```
/// use num_bigint::BigUint;
/// use u_noncesearch::objective::{Domain, Objective};
/// use u_noncesearch::orchestrator::{Orchestrator, SearchConfig};
/// use u_noncesearch::sa::{Perturbation, SaConfig};
/// use u_noncesearch::hill::HillConfig;
///
/// struct Distance(Domain);
///
/// impl Objective for Distance {
///     fn evaluate(&self, c: &BigUint) -> BigUint {
///         let target = BigUint::from(4242u32);
///         if c >= &target { c - &target } else { &target - c }
///     }
///     fn domain(&self) -> &Domain { &self.0 }
/// }
///
/// let objective = Distance(Domain::new(1u32.into(), 1_000_000u32.into()).unwrap());
/// let config = SearchConfig::default()
///     .with_max_rounds(5)
///     .with_anneal(
///         SaConfig::default()
///             .with_initial_temperature(100.0)
///             .with_max_iterations(200)
///             .with_perturbation(Perturbation::Fixed(1_000.0)),
///     )
///     .with_hill(HillConfig::default().with_step_init(1u32 << 20))
///     .with_seed(1);
///
/// let outcome = Orchestrator::new(config).unwrap().run(&objective).unwrap();
/// assert!(outcome.is_converged());
/// ```
pub struct Orchestrator<R: Regressor = StumpBoostRegressor> {
    config: SearchConfig,
    pool: WorkerPool,
    trainer: SurrogateTrainer<R>,
    sink: Arc<dyn EventSink>,
}

impl Orchestrator<StumpBoostRegressor> {
    /// Orchestrator with the default boosted-stump surrogate.
    pub fn new(config: SearchConfig) -> Result<Self> {
        Self::with_regressor(config, StumpBoostRegressor::default())
    }
}

impl<R: Regressor> Orchestrator<R> {
    /// Validates `config` and builds the worker pool. Any configuration
    /// problem is reported here, before a search starts.
    pub fn with_regressor(config: SearchConfig, regressor: R) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.pool.clone(), config.anneal.clone())?;
        let trainer = SurrogateTrainer::new(regressor, config.surrogate.clone())?;
        Ok(Self {
            config,
            pool,
            trainer,
            sink: Arc::new(TracingSink),
        })
    }

    /// Replaces the default [`TracingSink`].
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches until a zero-error candidate is found or `max_rounds` is
    /// spent.
    pub fn run<O: Objective + ?Sized>(&self, objective: &O) -> Result<SearchOutcome> {
        let sink = self.sink.as_ref();
        let mut rng = rng_from(self.config.seed);
        let mut history = TrainingHistory::new(self.config.surrogate.max_training_points);
        let mut best: Option<EvaluationResult> = None;
        let mut center: Option<BigUint> = None;

        tracing::info!(
            max_rounds = self.config.max_rounds,
            workers = self.config.pool.num_workers,
            "starting search"
        );

        for round in 1..=self.config.max_rounds {
            self.enter(round, Phase::Seeding);
            match &center {
                Some(c) => tracing::debug!(round, center = %c, "seeding from surrogate proposal"),
                None => tracing::debug!(round, "seeding randomly"),
            }

            self.enter(round, Phase::Searching);
            let pool_result = match self.pool.run(objective, center.as_ref(), round, sink) {
                Ok(result) => result,
                Err(PoolError::RoundFailure { failures }) => {
                    tracing::warn!(round, failures = failures.len(), "round failed");
                    sink.emit(&SearchEvent::RoundFailed {
                        round,
                        failures: failures.len(),
                    });
                    center = None;
                    continue;
                }
            };

            self.enter(round, Phase::Refining);
            let round_best = match pool_result.history.find_exact() {
                // Nothing left to refine
                Some(exact) => exact.clone(),
                None => {
                    let refined = HillClimber::run_with_observer(
                        objective,
                        &pool_result.best.candidate,
                        &self.config.hill,
                        &mut |step: HillClimbStep<'_>| {
                            sink.emit(&SearchEvent::HillClimbStep {
                                round,
                                iteration: step.iteration,
                                candidate: step.candidate.clone(),
                                error: step.error.clone(),
                                step: step.step.clone(),
                            })
                        },
                    )?;
                    EvaluationResult::new(refined.best, refined.best_error)
                }
            };

            sink.emit(&SearchEvent::RoundCompleted {
                round,
                candidate: round_best.candidate.clone(),
                error: round_best.error.clone(),
            });
            if best.as_ref().is_none_or(|b| round_best.error < b.error) {
                best = Some(round_best.clone());
            }

            if round_best.is_exact() {
                return Ok(self.finish_converged(round_best, round));
            }

            self.enter(round, Phase::Training);
            history.absorb(pool_result.history, round_best);
            let training = history.snapshot();
            tracing::debug!(round, points = training.len(), "training surrogate");

            center = match self.trainer.train(&training) {
                Ok(model) => {
                    let proposal =
                        self.trainer
                            .propose(&model, &training, objective.domain(), &mut rng);
                    if proposal.is_none() {
                        tracing::debug!(round, "surrogate produced no proposal");
                    }
                    proposal
                }
                Err(err) => {
                    tracing::debug!(round, %err, "surrogate unavailable, reseeding randomly");
                    None
                }
            };
        }

        self.enter(self.config.max_rounds, Phase::Done);
        tracing::info!(
            rounds = self.config.max_rounds,
            best_error = ?best.as_ref().map(|b| b.error.to_string()),
            "search exhausted"
        );
        self.sink.emit(&SearchEvent::Finished {
            rounds: self.config.max_rounds,
            converged: false,
            candidate: best.as_ref().map(|b| b.candidate.clone()),
            error: best.as_ref().map(|b| b.error.clone()),
        });
        Ok(SearchOutcome::Exhausted {
            best,
            rounds: self.config.max_rounds,
        })
    }

    fn finish_converged(&self, best: EvaluationResult, round: usize) -> SearchOutcome {
        self.enter(round, Phase::Done);
        tracing::info!(round, candidate = %best.candidate, "found zero-error candidate");
        self.sink.emit(&SearchEvent::Finished {
            rounds: round,
            converged: true,
            candidate: Some(best.candidate.clone()),
            error: Some(best.error.clone()),
        });
        SearchOutcome::Converged { best, round }
    }

    fn enter(&self, round: usize, phase: Phase) {
        tracing::trace!(round, ?phase, "phase");
    }
}

/// Surrogate training data kept across rounds.
///
/// Every round's refined best is kept. Raw worker evaluations are thinned
/// so the total stays within `limit` while refined bests fit in it.
#[derive(Debug)]
struct TrainingHistory {
    samples: SearchHistory,
    refined: SearchHistory,
    limit: usize,
}

impl TrainingHistory {
    fn new(limit: usize) -> Self {
        Self {
            samples: SearchHistory::new(),
            refined: SearchHistory::new(),
            limit,
        }
    }

    fn absorb(&mut self, evaluations: SearchHistory, refined: EvaluationResult) {
        self.refined.push(refined);
        self.samples.extend(evaluations);
        self.samples
            .thin_to(self.limit.saturating_sub(self.refined.len()));
    }

    fn snapshot(&self) -> SearchHistory {
        let mut all = SearchHistory::with_capacity(self.samples.len() + self.refined.len());
        all.extend(self.samples.clone());
        all.extend(self.refined.clone());
        all
    }
}
