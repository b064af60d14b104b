//! Suite teardown runs the slot's action at most once.

use crate::helpers::assertions::*;
use crate::helpers::mock_suite::MockSuite;

use suiteguard_core::error::SetupStage;
use suiteguard_core::teardown::Teardown;

/// A second teardown call is a no-op.
#[tokio::test]
async fn test_e2e_teardown_twice_runs_once() {
    let suite = MockSuite::new();
    let mut orchestrator = suite.build().expect("build should succeed");
    orchestrator.setup().await.expect("setup should succeed");

    assert!(orchestrator.teardown().await);
    assert!(!orchestrator.teardown().await);

    assert_eq!(suite.log.count("teardown:registry"), 1);
    assert!(orchestrator.teardown_slot().is_spent());
}

/// Concurrent teardown calls still run the action once.
#[tokio::test]
async fn test_e2e_concurrent_teardown_runs_once() {
    let suite = MockSuite::new().fail_at(SetupStage::Install);
    let mut orchestrator = suite.build().expect("build should succeed");
    let _ = orchestrator.setup().await;

    let (a, b) = tokio::join!(orchestrator.teardown(), orchestrator.teardown());

    assert!(a ^ b, "exactly one call should run the action");
    assert_teardowns(&suite.log, &["teardown:environment"]);
}

/// Teardown without any setup runs the initial noop.
#[tokio::test]
async fn test_e2e_teardown_without_setup_is_noop() {
    let suite = MockSuite::new();
    let orchestrator = suite.build().expect("build should succeed");

    assert_slot_holds(&orchestrator, "noop");
    assert!(orchestrator.teardown().await);
    assert!(suite.log.entries().is_empty());
}

/// Actions registered after teardown are discarded, never run.
#[tokio::test]
async fn test_e2e_late_action_after_teardown_is_discarded() {
    let suite = MockSuite::new();
    let orchestrator = suite.build().expect("build should succeed");
    orchestrator.teardown().await;

    let log = suite.log.clone();
    let accepted = orchestrator
        .teardown_slot()
        .set(Teardown::new("late", move || async move {
            log.record("teardown:late");
        }));

    assert!(!accepted);
    assert!(!orchestrator.teardown().await);
    assert!(!suite.log.contains("teardown:late"));
}

/// `run` tears down exactly once even when the body also tries to.
#[tokio::test]
async fn test_e2e_run_teardown_once_with_shared_slot() {
    let suite = MockSuite::new();
    let orchestrator = suite.build().expect("build should succeed");
    let slot = orchestrator.teardown_slot().clone();

    orchestrator
        .run(|_| async move {
            slot.run_once().await;
        })
        .await
        .expect("run should succeed");

    assert_eq!(suite.log.count("teardown:registry"), 1);
}
