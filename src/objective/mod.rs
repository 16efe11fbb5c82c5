//! Objective functions over arbitrary-precision scalar domains.
//!
//! The search engine only ever sees the [`Objective`] trait: a pure map
//! from a candidate integer to a non-negative integer error, together with
//! the inclusive [`Domain`] candidates are drawn from.
//!
//! - [`NonceObjective`]: ECDSA nonce-consistency error over a signature set
//! - [`CachedObjective`]: concurrent memoization wrapper for any objective

mod cache;
pub mod math;
mod nonce;
mod types;

pub use cache::{CacheStats, CachedObjective};
pub use nonce::{NonceObjective, SignatureRecord, SignatureSet};
pub use types::{Domain, EvaluationResult, Objective, SearchHistory};
