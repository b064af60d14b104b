//! The test command run between suite setup and teardown.
//!
//! The command inherits stdio and receives the suite context, the
//! published registry handle, and the report target as environment
//! variables. Ctrl-C kills the command so suite teardown still runs.

use std::process::Stdio;

use suiteguard_core::config::TimeoutConfig;
use suiteguard_core::types::SuiteContext;
use tokio::process::Command;

use crate::collaborators::{
    CommandError, ENV_APP_NAMESPACE, ENV_APPLICATION_IMAGE, ENV_DUMMY_IMAGE,
    ENV_REGISTRY_ENDPOINT, ENV_REGISTRY_NAMESPACE, ENV_RUN_ID, ENV_TEST_NAMESPACE,
};
use crate::error::RunnerError;
use crate::report::ReportTarget;
use crate::state::SuiteState;

pub const ENV_JUNIT_REPORT: &str = "SUITEGUARD_JUNIT_REPORT";
pub const ENV_EVENTUALLY_TIMEOUT_SECS: &str = "SUITEGUARD_EVENTUALLY_TIMEOUT_SECS";
pub const ENV_POLLING_INTERVAL_SECS: &str = "SUITEGUARD_POLLING_INTERVAL_SECS";

/// Environment exported to the test command.
pub fn suite_env(
    ctx: &SuiteContext,
    state: &SuiteState,
    report: &ReportTarget,
    timeouts: &TimeoutConfig,
) -> Vec<(String, String)> {
    let mut envs = vec![
        (ENV_RUN_ID.to_owned(), ctx.run_id.to_string()),
        (ENV_TEST_NAMESPACE.to_owned(), ctx.namespaces.test.to_string()),
        (
            ENV_APP_NAMESPACE.to_owned(),
            ctx.namespaces.application.to_string(),
        ),
        (ENV_APPLICATION_IMAGE.to_owned(), ctx.application_image.clone()),
        (ENV_DUMMY_IMAGE.to_owned(), ctx.dummy_image.clone()),
        (
            ENV_EVENTUALLY_TIMEOUT_SECS.to_owned(),
            timeouts.eventually_secs.to_string(),
        ),
        (
            ENV_POLLING_INTERVAL_SECS.to_owned(),
            timeouts.polling_interval_secs.to_string(),
        ),
    ];
    if let Some(registry) = state.registry() {
        envs.push((ENV_REGISTRY_ENDPOINT.to_owned(), registry.endpoint));
        envs.push((
            ENV_REGISTRY_NAMESPACE.to_owned(),
            registry.namespace.to_string(),
        ));
    }
    if let Some(path) = report.junit_path() {
        envs.push((ENV_JUNIT_REPORT.to_owned(), path.display().to_string()));
    }
    if let Some(kubeconfig) = &ctx.kubeconfig {
        envs.push(("KUBECONFIG".to_owned(), kubeconfig.display().to_string()));
    }
    envs
}

/// Run the test command to completion.
///
/// # Errors
///
/// [`RunnerError::TestCommand`] if it cannot be spawned,
/// [`RunnerError::TestsFailed`] on a non-zero exit, and
/// [`RunnerError::Interrupted`] on Ctrl-C.
pub async fn run_test_command(
    argv: &[String],
    envs: &[(String, String)],
) -> Result<(), RunnerError> {
    let (program, args) = argv.split_first().ok_or(CommandError::Empty)?;

    let mut child = Command::new(program)
        .args(args)
        .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CommandError::Spawn {
            program: program.clone(),
            source,
        })?;

    tracing::info!(program = %program, "test command started");

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|source| CommandError::Wait {
                program: program.clone(),
                source,
            })?;
            if status.success() {
                tracing::info!(program = %program, "test command passed");
                Ok(())
            } else {
                tracing::warn!(program = %program, status = %status, "test command failed");
                Err(RunnerError::TestsFailed(status.to_string()))
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupt received, stopping test command");
            if let Err(e) = child.kill().await {
                tracing::error!(error = %e, "failed to kill test command");
            }
            Err(RunnerError::Interrupted)
        }
    }
}
