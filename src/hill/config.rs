//! Hill climbing configuration.

use crate::error::{Result, SearchError};
use num_bigint::BigUint;

/// Configuration for the [`HillClimber`](super::HillClimber).
///
/// # Examples
///
/// ```
/// use u_noncesearch::hill::HillConfig;
///
/// let config = HillConfig::default()
///     .with_step_init(1_000u32)
///     .with_shrink_factor(10)
///     .with_max_iterations(500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HillConfig {
    /// Initial step size.
    pub step_init: BigUint,

    /// The climb stops once the step drops below this. Must be at least 1.
    pub min_step: BigUint,

    /// Maximum number of probe iterations.
    pub max_iterations: usize,

    /// Divisor applied to the step after an iteration without improvement.
    pub shrink_factor: u32,
}

impl Default for HillConfig {
    fn default() -> Self {
        Self {
            step_init: BigUint::from(1_000_000u32),
            min_step: BigUint::from(1u32),
            max_iterations: 10_000,
            shrink_factor: 2,
        }
    }
}

impl HillConfig {
    pub fn with_step_init(mut self, step: impl Into<BigUint>) -> Self {
        self.step_init = step.into();
        self
    }

    pub fn with_min_step(mut self, step: impl Into<BigUint>) -> Self {
        self.min_step = step.into();
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_shrink_factor(mut self, factor: u32) -> Self {
        self.shrink_factor = factor;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.min_step < BigUint::from(1u32) {
            return Err(SearchError::config("min_step must be at least 1"));
        }
        if self.step_init < self.min_step {
            return Err(SearchError::config(
                "step_init must be greater than or equal to min_step",
            ));
        }
        if self.max_iterations == 0 {
            return Err(SearchError::config("hill max_iterations must be positive"));
        }
        if self.shrink_factor < 2 {
            return Err(SearchError::config(format!(
                "shrink_factor must be at least 2, got {}",
                self.shrink_factor
            )));
        }
        Ok(())
    }
}
