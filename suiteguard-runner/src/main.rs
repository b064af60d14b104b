//! suiteguard -- end-to-end suite runner.
//!
//! # Usage
//!
//! ```bash
//! # Validate configuration only
//! suiteguard --config suiteguard.toml --validate
//!
//! # Set up, run the tests, tear down
//! suiteguard --config suiteguard.toml --namespace operators -- go test ./test/e2e/...
//! ```

use std::process::ExitCode;

use clap::Parser;

use suiteguard_runner::cli::SuiteCli;
use suiteguard_runner::collaborators::{
    CommandInstaller, CommandProvisioner, CommandRegistryInitializer, KubectlOperatorGroupClient,
};
use suiteguard_runner::test_command::{run_test_command, suite_env};
use suiteguard_runner::{ReportTarget, RunnerError, SuiteOrchestrator, logging, suite_state};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = SuiteCli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, exit_code = e.exit_code(), "suiteguard run failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: SuiteCli) -> Result<(), RunnerError> {
    let config = cli.load_config().await.map_err(RunnerError::Config)?;
    logging::init_tracing(&config.general)?;

    if cli.validate {
        let rendered = serde_json::to_string_pretty(&config).map_err(anyhow::Error::from)?;
        println!("{rendered}");
        tracing::info!("configuration is valid");
        return Ok(());
    }

    tracing::info!(
        config = ?cli.config,
        test_namespace = %config.namespaces.test,
        "suiteguard starting"
    );

    let report = ReportTarget::from_config(&config.report);
    let timeouts = config.timeouts.clone();
    let registry = CommandRegistryInitializer::from_config(&config).map_err(RunnerError::Config)?;

    let orchestrator = SuiteOrchestrator::builder()
        .provisioner(CommandProvisioner::from_config(&config))
        .installer(CommandInstaller::from_config(&config))
        .operator_group_client(KubectlOperatorGroupClient::from_config(&config))
        .registry_initializer(registry)
        .state(suite_state().clone())
        .config(config)
        .build()
        .map_err(RunnerError::from_suite)?;

    let ctx = orchestrator.context().clone();
    let test_command = cli.test_command;

    orchestrator
        .run_until(setup_interrupted(), |state| async move {
            if test_command.is_empty() {
                tracing::info!("no test command given, setup and teardown only");
                return Ok(());
            }
            let envs = suite_env(&ctx, &state, &report, &timeouts);
            run_test_command(&test_command, &envs).await
        })
        .await
        .map_err(RunnerError::from_suite)?
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn setup_interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::warn!("interrupt received during setup, tearing down"),
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C during setup");
            std::future::pending::<()>().await;
        }
    }
}
