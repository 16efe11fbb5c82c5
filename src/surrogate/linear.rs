//! Ordinary least squares on a single feature.

use super::types::{check_training_data, Predictor, Regressor, TrainingError};

/// `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub intercept: f64,
    pub slope: f64,
}

impl Predictor for LinearModel {
    fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Least-squares line through the training points.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLinearRegressor;

impl Regressor for LogLinearRegressor {
    type Model = LinearModel;

    fn fit(&self, xs: &[f64], ys: &[f64]) -> Result<LinearModel, TrainingError> {
        check_training_data(xs, ys)?;
        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let (mut sxy, mut sxx) = (0.0, 0.0);
        for (&x, &y) in xs.iter().zip(ys) {
            let dx = x - mean_x;
            sxy += dx * (y - mean_y);
            sxx += dx * dx;
        }
        if sxx <= f64::EPSILON * n {
            return Err(TrainingError::DegenerateFeature);
        }

        let slope = sxy / sxx;
        Ok(LinearModel {
            intercept: mean_y - slope * mean_x,
            slope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_exact_line() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 - 2.0 * x).collect();
        let model = LogLinearRegressor.fit(&xs, &ys).unwrap();
        assert!((model.slope + 2.0).abs() < 1e-12);
        assert!((model.intercept - 3.0).abs() < 1e-12);
        assert!((model.predict(10.0) + 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_feature() {
        let err = LogLinearRegressor.fit(&[2.0, 2.0, 2.0], &[1.0, 5.0, 3.0]).unwrap_err();
        assert_eq!(err, TrainingError::DegenerateFeature);
    }

    #[test]
    fn test_too_few_points() {
        let err = LogLinearRegressor.fit(&[1.0], &[1.0]).unwrap_err();
        assert!(matches!(err, TrainingError::InsufficientData { .. }));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = LogLinearRegressor
            .fit(&[1.0, f64::NAN], &[1.0, 2.0])
            .unwrap_err();
        assert_eq!(err, TrainingError::NonFinite);
    }
}
