//! SA configuration, proposal width and energy scaling.

use crate::error::{Result, SearchError};

/// Standard deviation of the Gaussian proposal step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Perturbation {
    /// Constant standard deviation.
    Fixed(f64),

    /// Standard deviation equal to the current temperature, so the search
    /// contracts as it cools.
    #[default]
    Temperature,

    /// Standard deviation equal to `factor * temperature`.
    TemperatureScaled(f64),
}

impl Perturbation {
    /// Proposal standard deviation at `temperature`.
    pub fn sigma(self, temperature: f64) -> f64 {
        match self {
            Perturbation::Fixed(sigma) => sigma,
            Perturbation::Temperature => temperature,
            Perturbation::TemperatureScaled(factor) => factor * temperature,
        }
    }
}

/// How an error difference is turned into a Metropolis exponent.
///
/// Raw differences of 256-bit errors divided by any practical temperature
/// underflow `exp` to zero, which silently turns annealing into greedy
/// descent. Both variants bring the exponent into a usable range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnergyScaling {
    /// Exponent `-(Δ / max(E, 1)) / (T / T_init)`: the worsening relative to
    /// the current error `E`, against the temperature relative to its start.
    /// Independent of the objective's magnitude.
    #[default]
    Relative,

    /// Exponent `-(Δ / scale) / T`.
    Fixed(f64),
}

/// Configuration for the Simulated Annealing algorithm.
///
/// # Examples
///
/// ```
/// use u_noncesearch::sa::{Perturbation, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(100.0)
///     .with_min_temperature(0.001)
///     .with_alpha(0.98)
///     .with_perturbation(Perturbation::Fixed(3.0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Minimum temperature. The algorithm stops when T drops below this.
    pub min_temperature: f64,

    /// Geometric cooling factor in (0, 1): `T_{k+1} = alpha * T_k`.
    pub alpha: f64,

    /// Maximum number of proposals.
    pub max_iterations: usize,

    /// Proposal width.
    pub perturbation: Perturbation,

    /// Metropolis exponent scaling.
    pub energy_scaling: EnergyScaling,

    /// Emit a progress snapshot every this many iterations. 0 disables it.
    pub progress_interval: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1e60,
            min_temperature: 1.0,
            alpha: 0.995,
            max_iterations: 10_000,
            perturbation: Perturbation::default(),
            energy_scaling: EnergyScaling::default(),
            progress_interval: 100,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_perturbation(mut self, perturbation: Perturbation) -> Self {
        self.perturbation = perturbation;
        self
    }

    pub fn with_energy_scaling(mut self, scaling: EnergyScaling) -> Self {
        self.energy_scaling = scaling;
        self
    }

    pub fn with_progress_interval(mut self, n: usize) -> Self {
        self.progress_interval = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(SearchError::config(
                "initial_temperature must be positive and finite",
            ));
        }
        if !(self.min_temperature.is_finite() && self.min_temperature > 0.0) {
            return Err(SearchError::config("min_temperature must be positive"));
        }
        if self.min_temperature >= self.initial_temperature {
            return Err(SearchError::config(
                "min_temperature must be less than initial_temperature",
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(SearchError::config(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.max_iterations == 0 {
            return Err(SearchError::config("max_iterations must be positive"));
        }
        match self.perturbation {
            Perturbation::Fixed(v) | Perturbation::TemperatureScaled(v) => {
                if !(v.is_finite() && v > 0.0) {
                    return Err(SearchError::config(format!(
                        "perturbation scale must be positive and finite, got {v}"
                    )));
                }
            }
            Perturbation::Temperature => {}
        }
        if let EnergyScaling::Fixed(scale) = self.energy_scaling {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(SearchError::config(format!(
                    "energy scale must be positive and finite, got {scale}"
                )));
            }
        }
        Ok(())
    }
}
