//! Search configuration.

use crate::error::{Result, SearchError};
use crate::hill::HillConfig;
use crate::pool::PoolConfig;
use crate::sa::SaConfig;
use crate::surrogate::SurrogateConfig;

/// Complete configuration of a search run.
///
/// # Defaults
///
/// ```
/// use u_noncesearch::orchestrator::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.max_rounds, 100);
/// assert_eq!(config.anneal.initial_temperature, 1e60);
/// assert_eq!(config.pool.num_workers, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Maximum number of rounds before reporting exhaustion.
    pub max_rounds: usize,

    /// Per-worker annealing parameters.
    pub anneal: SaConfig,

    /// Refinement parameters.
    pub hill: HillConfig,

    /// Parallelism and start-point parameters.
    pub pool: PoolConfig,

    /// Surrogate training and proposal parameters.
    pub surrogate: SurrogateConfig,

    /// Seed for the surrogate's sampling. Set together with the pool seed
    /// by [`with_seed`](Self::with_seed).
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_rounds: 100,
            anneal: SaConfig::default(),
            hill: HillConfig::default(),
            pool: PoolConfig::default(),
            surrogate: SurrogateConfig::default(),
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_max_rounds(mut self, n: usize) -> Self {
        self.max_rounds = n;
        self
    }

    pub fn with_anneal(mut self, anneal: SaConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_hill(mut self, hill: HillConfig) -> Self {
        self.hill = hill;
        self
    }

    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_surrogate(mut self, surrogate: SurrogateConfig) -> Self {
        self.surrogate = surrogate;
        self
    }

    /// Makes the whole run reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.pool.seed = Some(seed);
        self
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(SearchError::config("max_rounds must be at least 1"));
        }
        self.anneal.validate()?;
        self.hill.validate()?;
        self.pool.validate()?;
        self.surrogate.validate()?;
        Ok(())
    }
}
