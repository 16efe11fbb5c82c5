//! Surrogate trainer configuration.

use crate::error::{Result, SearchError};
use num_bigint::BigUint;

/// Configuration for the [`SurrogateTrainer`](super::SurrogateTrainer).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurrogateConfig {
    /// Minimum number of positive-error points needed to fit.
    pub min_points: usize,

    /// Points scanned per proposal strategy (linear window and log-uniform).
    pub num_samples: usize,

    /// Half-width of the linear scan window around the best candidate.
    pub search_radius: BigUint,

    /// Training points kept after evenly striding a long history.
    pub max_training_points: usize,
}

impl Default for SurrogateConfig {
    fn default() -> Self {
        Self {
            min_points: 2,
            num_samples: 100,
            search_radius: BigUint::from(10u32).pow(40u32),
            max_training_points: 5_000,
        }
    }
}

impl SurrogateConfig {
    pub fn with_min_points(mut self, n: usize) -> Self {
        self.min_points = n;
        self
    }

    pub fn with_num_samples(mut self, n: usize) -> Self {
        self.num_samples = n;
        self
    }

    pub fn with_search_radius(mut self, radius: impl Into<BigUint>) -> Self {
        self.search_radius = radius.into();
        self
    }

    pub fn with_max_training_points(mut self, n: usize) -> Self {
        self.max_training_points = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.min_points < 2 {
            return Err(SearchError::config("surrogate min_points must be at least 2"));
        }
        if self.num_samples < 2 {
            return Err(SearchError::config("surrogate num_samples must be at least 2"));
        }
        if self.max_training_points < self.min_points {
            return Err(SearchError::config(
                "max_training_points must be at least min_points",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SurrogateConfig::default();
        assert_eq!(config.min_points, 2);
        assert_eq!(config.num_samples, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(SurrogateConfig::default().with_min_points(1).validate().is_err());
        assert!(SurrogateConfig::default().with_num_samples(0).validate().is_err());
        assert!(SurrogateConfig::default()
            .with_min_points(10)
            .with_max_training_points(5)
            .validate()
            .is_err());
    }
}
