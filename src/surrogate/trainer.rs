//! Fitting the surrogate on search history and proposing the next seed.

use super::config::SurrogateConfig;
use super::types::{Predictor, Regressor, TrainingError};
use crate::error::Result;
use crate::numeric;
use crate::objective::{Domain, EvaluationResult, SearchHistory};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::Rng;

/// Trains a [`Regressor`] on `(ln candidate, ln error)` and scans it for
/// the most promising candidate.
#[derive(Debug, Clone)]
pub struct SurrogateTrainer<R> {
    regressor: R,
    config: SurrogateConfig,
}

impl<R: Regressor> SurrogateTrainer<R> {
    pub fn new(regressor: R, config: SurrogateConfig) -> Result<Self> {
        config.validate()?;
        regressor.validate()?;
        Ok(Self { regressor, config })
    }

    pub fn config(&self) -> &SurrogateConfig {
        &self.config
    }

    /// Fits a fresh model on the positive-error entries of `history`.
    ///
    /// Zero-error entries are skipped (their logarithm is undefined); the
    /// caller is expected to surface them directly.
    pub fn train(&self, history: &SearchHistory) -> std::result::Result<R::Model, TrainingError> {
        let usable: Vec<&EvaluationResult> = history
            .iter()
            .filter(|e| !e.error.is_zero() && !e.candidate.is_zero())
            .collect();
        if usable.len() < self.config.min_points {
            return Err(TrainingError::InsufficientData {
                required: self.config.min_points,
                available: usable.len(),
            });
        }

        let stride = usable.len().div_ceil(self.config.max_training_points);
        let points: Vec<&EvaluationResult> = usable.into_iter().step_by(stride).collect();

        let first = &points[0].candidate;
        if points.iter().all(|e| &e.candidate == first) {
            return Err(TrainingError::DegenerateFeature);
        }

        let xs: Vec<f64> = points.iter().map(|e| numeric::ln(&e.candidate)).collect();
        let ys: Vec<f64> = points.iter().map(|e| numeric::ln(&e.error)).collect();
        self.regressor.fit(&xs, &ys)
    }

    /// Returns the scanned candidate with the lowest predicted error.
    ///
    /// Scans `num_samples` evenly spaced points of the window
    /// `best ± search_radius` and `num_samples` log-uniform draws over the
    /// observed candidate range, all clamped to `domain`.
    pub fn propose<P, G>(
        &self,
        model: &P,
        history: &SearchHistory,
        domain: &Domain,
        rng: &mut G,
    ) -> Option<BigUint>
    where
        P: Predictor + ?Sized,
        G: Rng + ?Sized,
    {
        let best = history.best()?;
        let mut samples = self.window_samples(&best.candidate, domain);
        samples.extend(self.log_uniform_samples(history, domain, rng));

        let mut chosen: Option<(f64, BigUint)> = None;
        for candidate in samples {
            if candidate.is_zero() {
                continue;
            }
            let predicted = model.predict(numeric::ln(&candidate));
            if !predicted.is_finite() {
                continue;
            }
            if chosen.as_ref().is_none_or(|(p, _)| predicted < *p) {
                chosen = Some((predicted, candidate));
            }
        }
        chosen.map(|(_, candidate)| candidate)
    }

    fn window_samples(&self, center: &BigUint, domain: &Domain) -> Vec<BigUint> {
        let radius = &self.config.search_radius;
        let low = if center > radius {
            (center - radius).max(domain.low().clone())
        } else {
            domain.low().clone()
        };
        let high = (center + radius).min(domain.high().clone());
        if low > high {
            return Vec::new();
        }

        let span = &high - &low;
        let steps = self.config.num_samples - 1;
        (0..=steps)
            .map(|i| &low + &span * BigUint::from(i) / BigUint::from(steps))
            .collect()
    }

    fn log_uniform_samples<G: Rng + ?Sized>(
        &self,
        history: &SearchHistory,
        domain: &Domain,
        rng: &mut G,
    ) -> Vec<BigUint> {
        let mut positive = history.iter().map(|e| &e.candidate).filter(|c| !c.is_zero());
        let Some(first) = positive.next() else {
            return Vec::new();
        };
        let (min, max) = positive.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c)));
        if min == max {
            return Vec::new();
        }

        let (ln_min, ln_max) = (numeric::ln(min), numeric::ln(max));
        (0..self.config.num_samples)
            .filter_map(|_| numeric::exp(rng.random_range(ln_min..=ln_max)))
            .map(|c| domain.clamp(&c.into()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::surrogate::{LogLinearRegressor, StumpBoostRegressor};

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn history(points: &[(u64, u64)]) -> SearchHistory {
        let mut h = SearchHistory::new();
        for &(c, e) in points {
            h.record(big(c), big(e));
        }
        h
    }

    fn linear_trainer() -> SurrogateTrainer<LogLinearRegressor> {
        SurrogateTrainer::new(LogLinearRegressor, SurrogateConfig::default()).unwrap()
    }

    #[test]
    fn test_insufficient_data() {
        let err = linear_trainer().train(&history(&[(5, 3)])).unwrap_err();
        assert_eq!(
            err,
            TrainingError::InsufficientData {
                required: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_zero_error_entries_filtered() {
        let err = linear_trainer().train(&history(&[(5, 3), (7, 0)])).unwrap_err();
        assert!(matches!(err, TrainingError::InsufficientData { available: 1, .. }));
    }

    #[test]
    fn test_identical_candidates_degenerate() {
        let err = linear_trainer()
            .train(&history(&[(5, 3), (5, 3), (5, 3)]))
            .unwrap_err();
        assert_eq!(err, TrainingError::DegenerateFeature);
    }

    #[test]
    fn test_proposal_follows_trend() {
        // error = 10^6 / candidate: larger candidates predict lower error
        let h = history(&[(10, 100_000), (100, 10_000), (1_000, 1_000), (10_000, 100)]);
        let trainer = linear_trainer();
        let model = trainer.train(&h).unwrap();
        let domain = Domain::new(big(1), big(1_000_000)).unwrap();

        let proposal = trainer.propose(&model, &h, &domain, &mut create_rng(1)).unwrap();

        assert_eq!(proposal, big(1_000_000));
    }

    #[test]
    fn test_proposal_stays_in_domain() {
        let h = history(&[(3, 40), (9, 12), (14, 30), (2, 50), (11, 5)]);
        let trainer =
            SurrogateTrainer::new(StumpBoostRegressor::default(), SurrogateConfig::default()).unwrap();
        let model = trainer.train(&h).unwrap();
        let domain = Domain::new(big(1), big(16)).unwrap();
        let mut rng = create_rng(3);

        for _ in 0..20 {
            let proposal = trainer.propose(&model, &h, &domain, &mut rng).unwrap();
            assert!(domain.contains(&proposal));
        }
    }

    #[test]
    fn test_window_samples_cover_clamped_window() {
        let trainer = SurrogateTrainer::new(
            LogLinearRegressor,
            SurrogateConfig::default()
                .with_num_samples(5)
                .with_search_radius(10u32),
        )
        .unwrap();
        let domain = Domain::new(big(1), big(100)).unwrap();
        let samples = trainer.window_samples(&big(5), &domain);
        assert_eq!(samples, vec![big(1), big(4), big(8), big(11), big(15)]);
    }

    #[test]
    fn test_long_history_is_strided() {
        let points: Vec<(u64, u64)> = (1..=1_000).map(|c| (c, 2_000 - c)).collect();
        let trainer = SurrogateTrainer::new(
            LogLinearRegressor,
            SurrogateConfig::default().with_max_training_points(10),
        )
        .unwrap();
        assert!(trainer.train(&history(&points)).is_ok());
    }

    #[test]
    fn test_empty_history_has_no_proposal() {
        let trainer = linear_trainer();
        let model = crate::surrogate::LinearModel {
            intercept: 0.0,
            slope: 1.0,
        };
        let domain = Domain::new(big(1), big(10)).unwrap();
        assert!(trainer
            .propose(&model, &SearchHistory::new(), &domain, &mut create_rng(0))
            .is_none());
    }
}
