//! Assertion helpers for E2E tests.

use suiteguard_runner::SuiteOrchestrator;

use super::mock_collaborators::CallLog;

/// Assert the setup calls, in order, ignoring teardown entries.
#[allow(dead_code)]
pub fn assert_setup_calls(log: &CallLog, expected: &[&str]) {
    let calls: Vec<String> = log
        .entries()
        .into_iter()
        .filter(|e| !e.starts_with("teardown:"))
        .collect();
    assert_eq!(calls, expected, "unexpected setup call sequence");
}

/// Assert the teardown slot currently holds the action named `expected`.
#[allow(dead_code)]
pub fn assert_slot_holds(orchestrator: &SuiteOrchestrator, expected: &str) {
    assert_eq!(
        orchestrator.teardown_slot().current().as_deref(),
        Some(expected),
        "unexpected teardown slot contents"
    );
}

/// Assert the teardown actions that ran, in order.
#[allow(dead_code)]
pub fn assert_teardowns(log: &CallLog, expected: &[&str]) {
    assert_eq!(log.teardowns(), expected, "unexpected teardown runs");
}
