//! End-to-end searches over a toy group of order 17.
//!
//! Signatures are made with nonce 5 and private key 7, so the objective
//! has a single zero at `k = 5`.

use crossbeam_channel::unbounded;
use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::Arc;
use u_noncesearch::events::SearchEvent;
use u_noncesearch::objective::math::mod_inverse;
use u_noncesearch::objective::{NonceObjective, Objective, SignatureRecord, SignatureSet};
use u_noncesearch::orchestrator::{Orchestrator, SearchConfig, SearchOutcome};
use u_noncesearch::pool::PoolConfig;
use u_noncesearch::recovery::{NonceSearch, RecoveryReport};
use u_noncesearch::sa::{Perturbation, SaConfig};

const N: u64 = 17;
const NONCE: u64 = 5;
const KEY: u64 = 7;

/// Honors `RUST_LOG` when debugging a failing search.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn big(v: u64) -> BigUint {
    BigUint::from(v)
}

fn sign(r: u64, z: u64) -> SignatureRecord {
    let n = big(N);
    let k_inv = mod_inverse(&big(NONCE), &n).unwrap();
    let s = (k_inv * (big(z) + big(r) * big(KEY))) % &n;
    SignatureRecord::new(big(r), s, big(z))
}

fn toy_set() -> SignatureSet {
    SignatureSet::new(big(N), vec![sign(3, 11), sign(8, 2), sign(13, 9)]).unwrap()
}

fn toy_config(workers: usize) -> SearchConfig {
    SearchConfig::default()
        .with_max_rounds(50)
        .with_anneal(
            SaConfig::default()
                .with_initial_temperature(50.0)
                .with_max_iterations(500)
                .with_perturbation(Perturbation::Fixed(4.0)),
        )
        .with_pool(PoolConfig::default().with_num_workers(workers))
        .with_seed(2024)
}

#[test]
fn test_recovers_nonce_and_key() {
    init_tracing();
    let search = NonceSearch::new(toy_set(), toy_config(4)).unwrap();
    match search.run().unwrap() {
        RecoveryReport::Success {
            nonce,
            private_key,
            round,
        } => {
            assert_eq!(nonce, big(NONCE));
            assert_eq!(private_key, big(KEY));
            assert!(round <= 50);
        }
        other => panic!("search did not converge: {other:?}"),
    }
}

#[test]
fn test_single_worker_converges() {
    init_tracing();
    let objective = NonceObjective::new(toy_set()).unwrap();
    let outcome = Orchestrator::new(toy_config(1))
        .unwrap()
        .run(&objective)
        .unwrap();

    let SearchOutcome::Converged { best, .. } = outcome else {
        panic!("single worker did not converge");
    };
    assert_eq!(best.candidate, big(NONCE));
    assert!(best.error.is_zero());
}

#[test]
fn test_only_true_nonce_scores_zero() {
    let objective = NonceObjective::new(toy_set()).unwrap();
    for k in 1..N {
        let error = objective.evaluate(&big(k));
        assert_eq!(error.is_zero(), k == NONCE, "k = {k}, error = {error}");
    }
}

#[test]
fn test_non_invertible_r_is_skipped() {
    // r = 0 has no inverse: only two signatures remain usable
    let records = vec![sign(3, 11), SignatureRecord::new(big(0), big(4), big(6)), sign(8, 2)];
    let objective = NonceObjective::new(SignatureSet::new(big(N), records).unwrap()).unwrap();
    assert!(objective.evaluate(&big(NONCE)).is_zero());
    assert_eq!(objective.derive_keys(&big(NONCE))[1], None);
}

#[test]
fn test_single_usable_signature_is_penalized() {
    let records = vec![sign(3, 11), SignatureRecord::new(big(0), big(4), big(6))];
    let objective = NonceObjective::new(SignatureSet::new(big(N), records).unwrap()).unwrap();
    for k in 1..N {
        // One signature pair: C(2, 2)·(n − 1) + 1
        assert_eq!(objective.evaluate(&big(k)), big(N));
    }
}

#[test]
fn test_events_stream_over_channel() {
    let (tx, rx) = unbounded();
    let objective = NonceObjective::new(toy_set()).unwrap();
    let outcome = Orchestrator::new(toy_config(2))
        .unwrap()
        .with_sink(Arc::new(tx))
        .run(&objective)
        .unwrap();
    assert!(outcome.is_converged());

    let events: Vec<SearchEvent> = rx.try_iter().collect();
    assert!(events
        .iter()
        .any(|e| matches!(e, SearchEvent::RoundCompleted { .. })));
    match events.last() {
        Some(SearchEvent::Finished {
            converged,
            candidate,
            error,
            ..
        }) => {
            assert!(converged);
            assert_eq!(candidate.as_ref(), Some(&big(NONCE)));
            assert_eq!(error.as_ref().map(|e| e.is_zero()), Some(true));
        }
        other => panic!("last event was {other:?}"),
    }
}

#[test]
fn test_same_seed_same_outcome() {
    let objective = NonceObjective::new(toy_set()).unwrap();
    let run = || {
        Orchestrator::new(toy_config(3).with_max_rounds(1))
            .unwrap()
            .run(&objective)
            .unwrap()
    };
    assert_eq!(run(), run());
}
