//! Gradient-boosted regression stumps.
//!
//! Squared-error boosting of depth-1 trees on one feature: each round fits
//! the split that best explains the current residuals and adds a shrunken
//! copy of it to the ensemble.

use super::types::{check_training_data, Predictor, Regressor, TrainingError};
use crate::error::{Result, SearchError};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Stump {
    threshold: f64,
    left: f64,
    right: f64,
}

/// Fitted stump ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct StumpBoostModel {
    base: f64,
    stumps: Vec<Stump>,
}

impl StumpBoostModel {
    /// Number of fitted stumps.
    pub fn len(&self) -> usize {
        self.stumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stumps.is_empty()
    }
}

impl Predictor for StumpBoostModel {
    fn predict(&self, x: f64) -> f64 {
        self.stumps.iter().fold(self.base, |acc, s| {
            acc + if x <= s.threshold { s.left } else { s.right }
        })
    }
}

/// Boosted-stump regressor.
///
/// # Examples
///
/// ```
/// use u_noncesearch::surrogate::{Predictor, Regressor, StumpBoostRegressor};
///
/// let xs = [1.0, 2.0, 3.0, 4.0];
/// let ys = [0.0, 0.0, 5.0, 5.0];
/// let model = StumpBoostRegressor::default().fit(&xs, &ys).unwrap();
/// assert!((model.predict(3.5) - 5.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StumpBoostRegressor {
    /// Number of boosting rounds.
    pub n_estimators: usize,

    /// Shrinkage applied to each stump, in (0, 1].
    pub learning_rate: f64,
}

impl Default for StumpBoostRegressor {
    fn default() -> Self {
        Self {
            n_estimators: 50,
            learning_rate: 0.3,
        }
    }
}

impl StumpBoostRegressor {
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }
}

impl Regressor for StumpBoostRegressor {
    type Model = StumpBoostModel;

    fn fit(&self, xs: &[f64], ys: &[f64]) -> std::result::Result<StumpBoostModel, TrainingError> {
        check_training_data(xs, ys)?;
        let n = xs.len();

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));
        let sorted_x: Vec<f64> = order.iter().map(|&i| xs[i]).collect();

        let base = ys.iter().sum::<f64>() / n as f64;
        let mut residuals: Vec<f64> = order.iter().map(|&i| ys[i] - base).collect();
        let mut stumps = Vec::with_capacity(self.n_estimators);

        for _ in 0..self.n_estimators {
            let total: f64 = residuals.iter().sum();
            let mut left_sum = 0.0;
            // (gain, last left index, left sum)
            let mut best: Option<(f64, usize, f64)> = None;

            for i in 0..n - 1 {
                left_sum += residuals[i];
                if sorted_x[i] == sorted_x[i + 1] {
                    continue;
                }
                let n_left = (i + 1) as f64;
                let n_right = (n - i - 1) as f64;
                let right_sum = total - left_sum;
                let gain = left_sum * left_sum / n_left + right_sum * right_sum / n_right;
                if best.is_none_or(|(g, _, _)| gain > g) {
                    best = Some((gain, i, left_sum));
                }
            }

            let Some((_, split, left_sum)) = best else {
                break;
            };
            let n_left = (split + 1) as f64;
            let n_right = (n - split - 1) as f64;
            let stump = Stump {
                threshold: (sorted_x[split] + sorted_x[split + 1]) / 2.0,
                left: self.learning_rate * left_sum / n_left,
                right: self.learning_rate * (total - left_sum) / n_right,
            };

            for (i, r) in residuals.iter_mut().enumerate() {
                *r -= if i <= split { stump.left } else { stump.right };
            }
            stumps.push(stump);
        }

        Ok(StumpBoostModel { base, stumps })
    }

    fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(SearchError::config("n_estimators must be positive"));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(SearchError::config(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}
