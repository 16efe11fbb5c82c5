//! Worker pool configuration.

use crate::error::{Result, SearchError};
use num_bigint::BigUint;

/// Configuration for the [`WorkerPool`](super::WorkerPool).
///
/// # Examples
///
/// ```
/// use u_noncesearch::pool::PoolConfig;
///
/// let config = PoolConfig::default()
///     .with_num_workers(8)
///     .with_early_stop(false)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    /// Number of annealing workers (and threads).
    pub num_workers: usize,

    /// Half-width of the window around a seed center from which workers
    /// other than the first draw their start. `None` draws them from the
    /// whole domain.
    pub seed_spread: Option<BigUint>,

    /// Stop the remaining workers once one converges.
    pub early_stop: bool,

    /// Random seed for start points and per-worker RNGs.
    pub seed: Option<u64>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            num_workers: 4,
            seed_spread: Some(BigUint::from(10u32).pow(50u32)),
            early_stop: true,
            seed: None,
        }
    }
}

impl PoolConfig {
    pub fn with_num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn with_seed_spread(mut self, spread: Option<BigUint>) -> Self {
        self.seed_spread = spread;
        self
    }

    pub fn with_early_stop(mut self, early_stop: bool) -> Self {
        self.early_stop = early_stop;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.num_workers == 0 {
            return Err(SearchError::config("num_workers must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.num_workers, 4);
        assert!(config.early_stop);
        assert_eq!(config.seed_spread.unwrap().to_string().len(), 51);
    }

    #[test]
    fn test_validate_zero_workers() {
        assert!(PoolConfig::default().with_num_workers(0).validate().is_err());
    }
}
