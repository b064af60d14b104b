//! Operator group list/create through `kubectl`.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use suiteguard_core::collaborator::OperatorGroupClient;
use suiteguard_core::config::SuiteConfig;
use suiteguard_core::error::BoxError;
use suiteguard_core::types::{Namespace, OperatorGroup};

use super::ProcessRunner;

const RESOURCE: &str = "operatorgroups.operators.coreos.com";
const API_VERSION: &str = "operators.coreos.com/v1";

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    items: Vec<ResourceItem>,
}

#[derive(Debug, Deserialize)]
struct ResourceItem {
    metadata: Metadata,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
}

/// [`OperatorGroupClient`] that shells out to `kubectl`.
#[derive(Debug, Clone)]
pub struct KubectlOperatorGroupClient {
    kubectl: String,
    runner: ProcessRunner,
}

impl KubectlOperatorGroupClient {
    pub fn new(kubectl: impl Into<String>, kubeconfig: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            kubectl: kubectl.into(),
            runner: ProcessRunner::new(timeout).kubeconfig(kubeconfig.as_deref()),
        }
    }

    pub fn from_config(config: &SuiteConfig) -> Self {
        Self::new(
            config.commands.kubectl.clone(),
            config.cluster.kubeconfig_path(),
            config.commands.timeout(),
        )
    }

    fn argv(&self, args: &[&str]) -> Vec<String> {
        std::iter::once(self.kubectl.clone())
            .chain(args.iter().map(|a| (*a).to_owned()))
            .collect()
    }
}

impl OperatorGroupClient for KubectlOperatorGroupClient {
    async fn list(&self, namespace: &Namespace) -> Result<Vec<OperatorGroup>, BoxError> {
        let argv = self.argv(&["get", RESOURCE, "-n", namespace.as_str(), "-o", "json"]);
        let stdout = self.runner.run(&argv).await?;
        parse_list(&stdout, namespace)
    }

    async fn create(&self, namespace: &Namespace, group: OperatorGroup) -> Result<(), BoxError> {
        let manifest = manifest(&group);
        let argv = self.argv(&["create", "-n", namespace.as_str(), "-f", "-"]);
        self.runner
            .run_with_input(&argv, Some(manifest.as_bytes()))
            .await?;
        Ok(())
    }
}

fn parse_list(stdout: &str, namespace: &Namespace) -> Result<Vec<OperatorGroup>, BoxError> {
    let list: ResourceList = serde_json::from_str(stdout)?;
    Ok(list
        .items
        .into_iter()
        .map(|item| OperatorGroup {
            name: item.metadata.name,
            namespace: item
                .metadata
                .namespace
                .unwrap_or_else(|| namespace.as_str().to_owned()),
        })
        .collect())
}

fn manifest(group: &OperatorGroup) -> String {
    json!({
        "apiVersion": API_VERSION,
        "kind": "OperatorGroup",
        "metadata": {
            "name": group.name,
            "namespace": group.namespace,
        },
    })
    .to_string()
}
