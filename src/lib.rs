//! Surrogate-guided search over arbitrary-precision scalar domains.
//!
//! The engine minimizes a non-negative integer error over an inclusive
//! range of big integers. It combines:
//!
//! - **Simulated Annealing (SA)**: Gaussian proposals on a big-integer
//!   domain with geometric cooling and Metropolis acceptance.
//! - **Worker pool**: independent annealers on a `rayon` thread pool,
//!   seeded around a shared center, reduced to the best result.
//! - **Hill climbing**: deterministic step-halving refinement of the
//!   pool's best point.
//! - **Surrogate model**: a regressor over `(ln candidate, ln error)` that
//!   proposes where the next round should start.
//! - **Orchestrator**: the round loop tying the above together.
//!
//! The bundled objective, [`NonceObjective`](objective::NonceObjective),
//! scores a trial ECDSA nonce by how well the private keys it implies
//! across a set of signatures agree; [`recovery::NonceSearch`] runs the
//! whole pipeline against such a set.
//!
//! # Example
//!
//! ```no_run
//! use u_noncesearch::objective::{SignatureRecord, SignatureSet};
//! use u_noncesearch::orchestrator::SearchConfig;
//! use u_noncesearch::recovery::{NonceSearch, RecoveryReport};
//!
//! let records = vec![
//!     SignatureRecord::from_hex("1f", "2a", "33").unwrap(),
//!     SignatureRecord::from_hex("4b", "5c", "6d").unwrap(),
//! ];
//! let signatures = SignatureSet::secp256k1(records).unwrap();
//! let search = NonceSearch::new(signatures, SearchConfig::default().with_seed(7)).unwrap();
//!
//! if let RecoveryReport::Success { private_key, .. } = search.run().unwrap() {
//!     println!("d = {private_key:x}");
//! }
//! ```

pub mod error;
pub mod events;
pub mod hill;
pub mod numeric;
pub mod objective;
pub mod orchestrator;
pub mod pool;
pub mod random;
pub mod recovery;
pub mod sa;
pub mod surrogate;

pub use error::{Result, SearchError};
