//! Application installation through a configured command.

use std::time::Duration;

use suiteguard_core::collaborator::Installer;
use suiteguard_core::config::SuiteConfig;
use suiteguard_core::error::BoxError;
use suiteguard_core::types::{EnvironmentHandle, SuiteContext};

use super::{ENV_CLUSTER_NAME, ProcessRunner, with_context};

/// Runs `commands.install` against the provisioned environment.
///
/// The command must be idempotent or fail; there are no retries. An empty
/// command skips installation.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    install: Vec<String>,
    timeout: Duration,
}

impl CommandInstaller {
    pub fn new(install: Vec<String>, timeout: Duration) -> Self {
        Self { install, timeout }
    }

    pub fn from_config(config: &SuiteConfig) -> Self {
        Self::new(config.commands.install.clone(), config.commands.timeout())
    }
}

impl Installer for CommandInstaller {
    async fn install(
        &self,
        ctx: &SuiteContext,
        environment: &EnvironmentHandle,
    ) -> Result<(), BoxError> {
        if self.install.is_empty() {
            tracing::info!("no install command configured, skipping installation");
            return Ok(());
        }

        with_context(ProcessRunner::new(self.timeout), ctx)
            .env(ENV_CLUSTER_NAME, environment.name.as_str())
            .kubeconfig(environment.kubeconfig.as_deref())
            .run(&self.install)
            .await?;

        tracing::info!(
            environment = %environment.name,
            image = %ctx.application_image,
            "application installed"
        );
        Ok(())
    }
}
