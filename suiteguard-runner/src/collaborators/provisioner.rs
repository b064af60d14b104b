//! Environment provisioning through configured commands.

use std::time::Duration;

use suiteguard_core::collaborator::{Provisioned, Provisioner};
use suiteguard_core::config::SuiteConfig;
use suiteguard_core::error::BoxError;
use suiteguard_core::teardown::Teardown;
use suiteguard_core::types::{EnvironmentHandle, SuiteContext};

use super::{ENV_CLUSTER_NAME, ProcessRunner, with_context};

/// Brings the environment up with `commands.provision` and registers
/// `commands.deprovision` as its teardown.
///
/// An empty provision command means the environment already exists (for
/// example a cluster reached through `--kubeconfig`); nothing is created
/// and, unless a deprovision command is set, nothing is torn down.
#[derive(Debug, Clone)]
pub struct CommandProvisioner {
    cluster_name: String,
    provision: Vec<String>,
    deprovision: Vec<String>,
    timeout: Duration,
}

impl CommandProvisioner {
    pub fn new(
        cluster_name: impl Into<String>,
        provision: Vec<String>,
        deprovision: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            provision,
            deprovision,
            timeout,
        }
    }

    pub fn from_config(config: &SuiteConfig) -> Self {
        Self::new(
            config.cluster.name.clone(),
            config.commands.provision.clone(),
            config.commands.deprovision.clone(),
            config.commands.timeout(),
        )
    }
}

impl Provisioner for CommandProvisioner {
    async fn provision(&self, ctx: &SuiteContext) -> Result<Provisioned, BoxError> {
        let runner = with_context(ProcessRunner::new(self.timeout), ctx)
            .env(ENV_CLUSTER_NAME, self.cluster_name.as_str());

        if self.provision.is_empty() {
            tracing::info!(
                cluster = %self.cluster_name,
                "no provision command configured, using existing environment"
            );
        } else {
            runner.run(&self.provision).await?;
            tracing::info!(cluster = %self.cluster_name, "environment provisioned");
        }

        let environment = EnvironmentHandle {
            name: self.cluster_name.clone(),
            kubeconfig: ctx.kubeconfig.clone(),
        };

        let teardown = if self.deprovision.is_empty() {
            Teardown::new("environment", || async {
                tracing::debug!("no deprovision command configured, leaving environment");
            })
        } else {
            let argv = self.deprovision.clone();
            let cluster = self.cluster_name.clone();
            Teardown::new("environment", move || async move {
                match runner.run(&argv).await {
                    Ok(_) => tracing::info!(cluster = %cluster, "environment deprovisioned"),
                    Err(e) => tracing::error!(
                        cluster = %cluster,
                        error = %e,
                        "environment teardown failed"
                    ),
                }
            })
        };

        Ok(Provisioned {
            environment,
            teardown,
        })
    }
}
