//! Setup runs once per orchestrator and never registers into a spent slot.

use crate::helpers::assertions::*;
use crate::helpers::mock_suite::MockSuite;

use suiteguard_core::error::{SetupStage, SuiteError};

/// A second setup is refused and provisions nothing.
#[tokio::test]
async fn test_e2e_second_setup_is_rejected() {
    let suite = MockSuite::new();
    let mut orchestrator = suite.build().expect("build should succeed");
    orchestrator.setup().await.expect("setup should succeed");

    let err = orchestrator.setup().await.unwrap_err();

    assert!(matches!(
        err,
        SuiteError::AlreadySetUp {
            completed: SetupStage::Publish
        }
    ));
    assert_eq!(suite.log.count("provision"), 1);
    assert_slot_holds(&orchestrator, "registry");
}

/// A failed setup is not retried on the same orchestrator.
#[tokio::test]
async fn test_e2e_setup_after_failure_is_rejected() {
    let suite = MockSuite::new().fail_at(SetupStage::Install);
    let mut orchestrator = suite.build().expect("build should succeed");
    let _ = orchestrator.setup().await;

    let err = orchestrator.setup().await.unwrap_err();

    assert!(matches!(
        err,
        SuiteError::AlreadySetUp {
            completed: SetupStage::Provision
        }
    ));
    assert_eq!(suite.log.count("provision"), 1);
    assert_slot_holds(&orchestrator, "environment");
}

/// Setup after teardown touches no collaborator.
#[tokio::test]
async fn test_e2e_setup_after_teardown_is_rejected() {
    let suite = MockSuite::new();
    let mut orchestrator = suite.build().expect("build should succeed");
    orchestrator.teardown().await;

    let err = orchestrator.setup().await.unwrap_err();

    assert!(matches!(
        err,
        SuiteError::TeardownSpent {
            stage: SetupStage::Provision
        }
    ));
    assert!(suite.log.entries().is_empty());
}

/// Teardown fires while install is in flight: the registry set up
/// afterwards is released immediately instead of leaking.
#[tokio::test]
async fn test_e2e_teardown_during_setup_releases_late_registry() {
    let suite = MockSuite::new().gate_install();
    let mut orchestrator = suite.build().expect("build should succeed");
    let slot = orchestrator.teardown_slot().clone();
    let log = suite.log.clone();
    let gate = suite.install_gate.clone();

    let (result, ()) = tokio::join!(orchestrator.setup(), async move {
        while !log.contains("install:mock-env") {
            tokio::task::yield_now().await;
        }
        assert!(slot.run_once().await);
        gate.notify_one();
    });

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        SuiteError::TeardownSpent {
            stage: SetupStage::Registry
        }
    ));
    assert_teardowns(
        &suite.log,
        &["teardown:environment", "teardown:registry"],
    );
    assert!(suite.state.registry().is_none());
}
