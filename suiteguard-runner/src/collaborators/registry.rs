//! Auxiliary registry bring-up through configured commands.

use std::time::Duration;

use suiteguard_core::collaborator::{RegistryInit, RegistryInitializer};
use suiteguard_core::config::SuiteConfig;
use suiteguard_core::error::{BoxError, ConfigError, SuiteError};
use suiteguard_core::teardown::Teardown;
use suiteguard_core::types::{EnvironmentHandle, Namespace, RegistryHandle};

use super::{ENV_CLUSTER_NAME, ENV_REGISTRY_NAMESPACE, ProcessRunner};

/// Starts the registry with `commands.registry_up` and registers
/// `commands.registry_down` as its teardown.
///
/// The last non-empty line `registry_up` prints is the registry endpoint.
#[derive(Debug, Clone)]
pub struct CommandRegistryInitializer {
    up: Vec<String>,
    down: Vec<String>,
    timeout: Duration,
}

impl CommandRegistryInitializer {
    /// # Errors
    ///
    /// Returns a config error if `up` is empty; the registry stage has no
    /// default.
    pub fn new(up: Vec<String>, down: Vec<String>, timeout: Duration) -> Result<Self, SuiteError> {
        if up.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "commands.registry_up".to_owned(),
                reason: "a registry start command is required".to_owned(),
            }
            .into());
        }
        Ok(Self { up, down, timeout })
    }

    pub fn from_config(config: &SuiteConfig) -> Result<Self, SuiteError> {
        Self::new(
            config.commands.registry_up.clone(),
            config.commands.registry_down.clone(),
            config.commands.timeout(),
        )
    }
}

impl RegistryInitializer for CommandRegistryInitializer {
    async fn initialize(
        &self,
        namespace: &Namespace,
        environment: &EnvironmentHandle,
    ) -> Result<RegistryInit, BoxError> {
        let runner = ProcessRunner::new(self.timeout)
            .env(ENV_REGISTRY_NAMESPACE, namespace.as_str())
            .env(ENV_CLUSTER_NAME, environment.name.as_str())
            .kubeconfig(environment.kubeconfig.as_deref());

        let stdout = runner.run(&self.up).await?;
        let endpoint = last_line(&stdout)
            .ok_or("registry start command printed no endpoint")?
            .to_owned();
        tracing::info!(namespace = %namespace, endpoint = %endpoint, "registry started");

        let teardown = if self.down.is_empty() {
            Teardown::new("registry", || async {
                tracing::debug!("no registry stop command configured, leaving registry");
            })
        } else {
            let argv = self.down.clone();
            let ns = namespace.clone();
            Teardown::new("registry", move || async move {
                match runner.run(&argv).await {
                    Ok(_) => tracing::info!(namespace = %ns, "registry stopped"),
                    Err(e) => {
                        tracing::error!(namespace = %ns, error = %e, "registry teardown failed")
                    }
                }
            })
        };

        Ok(RegistryInit {
            handle: RegistryHandle {
                endpoint,
                namespace: namespace.clone(),
            },
            teardown,
        })
    }
}

fn last_line(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).rfind(|line| !line.is_empty())
}
