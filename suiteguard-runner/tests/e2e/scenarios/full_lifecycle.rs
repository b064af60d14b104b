//! Full suite lifecycle: setup succeeds, the body sees the registry, and
//! teardown runs the registry action once.

use crate::helpers::assertions::*;
use crate::helpers::mock_collaborators::*;
use crate::helpers::mock_suite::MockSuite;

use suiteguard_core::error::SetupStage;
use suiteguard_runner::EnsureOutcome;

/// Stages run in order: provision, install, precondition, registry.
#[tokio::test]
async fn test_e2e_setup_runs_stages_in_order() {
    let suite = MockSuite::new();
    let mut orchestrator = suite.build().expect("build should succeed");

    orchestrator.setup().await.expect("setup should succeed");

    assert_setup_calls(
        &suite.log,
        &[
            "provision",
            "install:mock-env",
            "list:ns-a",
            "create:ns-a/opgroup",
            "registry:ns-a",
        ],
    );
    assert_eq!(orchestrator.completed_stage(), Some(SetupStage::Publish));
}

/// After full success the slot holds the registry teardown only.
#[tokio::test]
async fn test_e2e_slot_holds_registry_teardown_after_success() {
    let suite = MockSuite::new();
    let mut orchestrator = suite.build().expect("build should succeed");

    let summary = orchestrator.setup().await.expect("setup should succeed");

    assert_slot_holds(&orchestrator, "registry");
    assert_eq!(summary.teardown.as_deref(), Some("registry"));
    assert_eq!(summary.environment.name, MOCK_ENVIRONMENT);
    assert_eq!(
        summary.precondition,
        EnsureOutcome::Created {
            name: "opgroup".to_owned()
        }
    );

    assert!(orchestrator.teardown().await);
    assert_teardowns(&suite.log, &["teardown:registry"]);
    assert!(
        !suite.log.contains("teardown:environment"),
        "replace mode must not run the superseded environment teardown"
    );
}

/// The registry handle is published for the body and cleared at suite end.
#[tokio::test]
async fn test_e2e_registry_handle_published_then_cleared() {
    let suite = MockSuite::new();
    let state = suite.state.clone();
    let orchestrator = suite.build().expect("build should succeed");

    let seen = orchestrator
        .run(|state| async move { state.registry() })
        .await
        .expect("run should succeed");

    let handle = seen.expect("body should see the registry handle");
    assert_eq!(handle.endpoint, MOCK_ENDPOINT);
    assert_eq!(handle.namespace.as_str(), "ns-a");
    assert!(state.registry().is_none(), "state should be cleared at suite end");
    assert_teardowns(&suite.log, &["teardown:registry"]);
}

/// The body's return value passes through `run`.
#[tokio::test]
async fn test_e2e_run_returns_body_value_after_teardown() {
    let suite = MockSuite::new();
    let log = suite.log.clone();
    let orchestrator = suite.build().expect("build should succeed");

    let teardowns_seen_in_body = orchestrator
        .run(|_| async move { log.teardowns().len() })
        .await
        .expect("run should succeed");

    assert_eq!(teardowns_seen_in_body, 0, "teardown must not run before the body");
    assert_eq!(suite.log.teardowns().len(), 1);
}

/// The provisioned environment is exposed after stage 2.
#[tokio::test]
async fn test_e2e_environment_available_after_setup() {
    let suite = MockSuite::new();
    let mut orchestrator = suite.build().expect("build should succeed");
    assert!(orchestrator.environment().is_none());

    orchestrator.setup().await.expect("setup should succeed");

    assert_eq!(
        orchestrator.environment().map(|e| e.name.as_str()),
        Some(MOCK_ENVIRONMENT)
    );
}
