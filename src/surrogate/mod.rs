//! Surrogate models over the search history.
//!
//! A cheap regressor of `ln(error)` on `ln(candidate)` is refitted from
//! scratch every round and scanned to pick the seed of the next round.
//! Proposals are only hints: the next round evaluates them with the real
//! objective.
//!
//! # Key Types
//!
//! - [`Regressor`] / [`Predictor`]: pluggable single-feature regression
//! - [`LogLinearRegressor`]: ordinary least squares
//! - [`StumpBoostRegressor`]: gradient-boosted regression stumps
//! - [`SurrogateTrainer`]: history filtering, fitting and proposal

mod boost;
mod config;
mod linear;
mod trainer;
mod types;

pub use boost::{StumpBoostModel, StumpBoostRegressor};
pub use config::SurrogateConfig;
pub use linear::{LinearModel, LogLinearRegressor};
pub use trainer::SurrogateTrainer;
pub use types::{Predictor, Regressor, TrainingError};
