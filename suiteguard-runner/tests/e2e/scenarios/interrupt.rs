//! Interrupting setup still tears down what was already provisioned.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::helpers::assertions::*;
use crate::helpers::mock_collaborators::{CallLog, MOCK_ENDPOINT};
use crate::helpers::mock_suite::MockSuite;

use suiteguard_core::error::{SetupStage, SuiteError};

/// Resolves once `entry` has been recorded.
async fn recorded(log: CallLog, entry: &'static str) {
    while !log.contains(entry) {
        tokio::task::yield_now().await;
    }
}

/// Cancelled while install hangs: the environment teardown runs and the
/// body never does.
#[tokio::test]
async fn test_e2e_interrupt_during_install_tears_down_environment() {
    let suite = MockSuite::new().gate_install();
    let orchestrator = suite.build().expect("build should succeed");
    let body_ran = AtomicBool::new(false);

    let err = orchestrator
        .run_until(recorded(suite.log.clone(), "install:mock-env"), |_| async {
            body_ran.store(true, Ordering::SeqCst);
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SuiteError::Interrupted {
            stage: SetupStage::Install
        }
    ));
    assert_setup_calls(&suite.log, &["provision", "install:mock-env"]);
    assert_teardowns(&suite.log, &["teardown:environment"]);
    assert!(!body_ran.load(Ordering::SeqCst));
    assert!(suite.state.registry().is_none());
}

/// Same in chain mode: only the environment part exists yet.
#[tokio::test]
async fn test_e2e_interrupt_in_chain_mode_tears_down_environment_once() {
    let suite = MockSuite::new()
        .config(
            crate::helpers::config::TestConfigBuilder::new()
                .teardown_mode("chain")
                .build(),
        )
        .gate_install();
    let orchestrator = suite.build().expect("build should succeed");

    let err = orchestrator
        .run_until(recorded(suite.log.clone(), "install:mock-env"), |_| async {})
        .await
        .unwrap_err();

    assert_eq!(err.stage(), SetupStage::Install);
    assert_eq!(suite.log.count("teardown:environment"), 1);
    assert!(!suite.log.contains("teardown:registry"));
}

/// Cancellation only covers setup; once the body runs it finishes.
#[tokio::test]
async fn test_e2e_cancel_after_setup_does_not_stop_body() {
    let suite = MockSuite::new();
    let orchestrator = suite.build().expect("build should succeed");
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let endpoint = orchestrator
        .run_until(
            async move {
                let _ = rx.await;
            },
            |state| async move {
                let _ = tx.send(());
                tokio::task::yield_now().await;
                state.registry().map(|h| h.endpoint)
            },
        )
        .await
        .expect("run should succeed");

    assert_eq!(endpoint.as_deref(), Some(MOCK_ENDPOINT));
    assert_teardowns(&suite.log, &["teardown:registry"]);
}
