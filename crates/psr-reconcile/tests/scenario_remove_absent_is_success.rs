use psr_reconcile::{Reconciler, RemoveOutcome};
use psr_store::{ParameterType, StoreError, StoreErrorKind};
use psr_testkit::{StoreCall, StoreOp, StorePair};

fn reconciler(pair: &StorePair) -> Reconciler {
    Reconciler::new(pair.source_gateway(), pair.target_gateway())
}

#[tokio::test]
async fn scenario_remove_present_name() {
    let pair = StorePair::new();
    pair.target.seed("/app/old", "x", ParameterType::String);

    let outcome = reconciler(&pair).remove("/app/old").await.unwrap();
    assert_eq!(outcome, RemoveOutcome::Removed);
    assert!(pair.target.current("/app/old").is_none());
}

/// Name exists only on source (never replicated): delete still succeeds.
#[tokio::test]
async fn scenario_remove_never_replicated_name() {
    let pair = StorePair::new();
    pair.source.seed("/app/local", "x", ParameterType::String);

    let outcome = reconciler(&pair).remove("/app/local").await.unwrap();
    assert_eq!(outcome, RemoveOutcome::AlreadyAbsent);
    assert_eq!(
        pair.target.calls(),
        vec![StoreCall::Delete {
            name: "/app/local".to_string()
        }]
    );
    assert!(pair.source.calls().is_empty());
    assert!(pair.source.current("/app/local").is_some());
}

#[tokio::test]
async fn scenario_remove_is_idempotent() {
    let pair = StorePair::new();
    pair.target.seed("/a", "x", ParameterType::String);
    let r = reconciler(&pair);

    assert_eq!(r.remove("/a").await.unwrap(), RemoveOutcome::Removed);
    assert_eq!(r.remove("/a").await.unwrap(), RemoveOutcome::AlreadyAbsent);
    assert_eq!(pair.target.count(StoreOp::Delete), 2);
}

#[tokio::test]
async fn scenario_remove_other_failures_propagate() {
    let pair = StorePair::new();
    pair.target.seed("/a", "x", ParameterType::String);
    pair.target
        .fail(StoreOp::Delete, StoreError::throttled("rate exceeded"));

    let err = reconciler(&pair).remove("/a").await.unwrap_err();
    assert_eq!(err.kind, StoreErrorKind::Throttled);
    assert!(err.retryable);
    assert!(pair.target.current("/a").is_some());
}
