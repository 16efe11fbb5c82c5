//! Parallel annealing worker pool.
//!
//! Runs independent [`SaRunner`](crate::sa::SaRunner) instances on a
//! dedicated rayon pool and reduces them to a single global best. Workers
//! share nothing mutable except an early-stop flag; a panicking worker is
//! isolated and excluded from the reduction.

mod config;
mod runner;

pub use config::PoolConfig;
pub use runner::{PoolError, PoolResult, WorkerFailure, WorkerPool, WorkerReport};
