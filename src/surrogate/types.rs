//! Regression traits.

use crate::error::Result as SearchResult;
use thiserror::Error;

/// Why a surrogate could not be fitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("need at least {required} points with positive error, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("all training candidates are identical")]
    DegenerateFeature,

    #[error("feature and target lengths differ: {features} vs {targets}")]
    LengthMismatch { features: usize, targets: usize },

    #[error("training data contains non-finite values")]
    NonFinite,
}

/// A fitted single-feature model.
pub trait Predictor: Send + Sync {
    fn predict(&self, x: f64) -> f64;
}

/// Fits a fresh [`Predictor`] from `(x, y)` pairs.
///
/// Regressors hold only hyper-parameters; every call to [`fit`](Self::fit)
/// starts from scratch.
pub trait Regressor: Send + Sync {
    type Model: Predictor;

    fn fit(&self, xs: &[f64], ys: &[f64]) -> Result<Self::Model, TrainingError>;

    /// Checks hyper-parameters before any search starts.
    fn validate(&self) -> SearchResult<()> {
        Ok(())
    }
}

/// Shared input checks for regressors.
pub(crate) fn check_training_data(xs: &[f64], ys: &[f64]) -> Result<(), TrainingError> {
    if xs.len() != ys.len() {
        return Err(TrainingError::LengthMismatch {
            features: xs.len(),
            targets: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(TrainingError::InsufficientData {
            required: 2,
            available: xs.len(),
        });
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(TrainingError::NonFinite);
    }
    let first = xs[0];
    if xs.iter().all(|&x| x == first) {
        return Err(TrainingError::DegenerateFeature);
    }
    Ok(())
}
