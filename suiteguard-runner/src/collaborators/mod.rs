//! Command-backed collaborators.
//!
//! Each collaborator wraps argv commands from the `[commands]` config
//! section. Commands see the suite context through environment variables:
//!
//! | Variable | Value |
//! |----------|-------|
//! | `SUITEGUARD_RUN_ID` | suite run id |
//! | `SUITEGUARD_TEST_NAMESPACE` | test namespace |
//! | `SUITEGUARD_APP_NAMESPACE` | application namespace |
//! | `SUITEGUARD_APPLICATION_IMAGE` | application image |
//! | `SUITEGUARD_DUMMY_IMAGE` | dummy operator image |
//! | `SUITEGUARD_CLUSTER_NAME` | environment name |
//! | `KUBECONFIG` | cluster access path, when known |

pub mod installer;
pub mod kubectl;
pub mod process;
pub mod provisioner;
pub mod registry;

pub use installer::CommandInstaller;
pub use kubectl::KubectlOperatorGroupClient;
pub use process::{CommandError, ProcessRunner};
pub use provisioner::CommandProvisioner;
pub use registry::CommandRegistryInitializer;

use suiteguard_core::types::SuiteContext;

pub const ENV_RUN_ID: &str = "SUITEGUARD_RUN_ID";
pub const ENV_TEST_NAMESPACE: &str = "SUITEGUARD_TEST_NAMESPACE";
pub const ENV_APP_NAMESPACE: &str = "SUITEGUARD_APP_NAMESPACE";
pub const ENV_APPLICATION_IMAGE: &str = "SUITEGUARD_APPLICATION_IMAGE";
pub const ENV_DUMMY_IMAGE: &str = "SUITEGUARD_DUMMY_IMAGE";
pub const ENV_CLUSTER_NAME: &str = "SUITEGUARD_CLUSTER_NAME";
pub const ENV_REGISTRY_NAMESPACE: &str = "SUITEGUARD_REGISTRY_NAMESPACE";
pub const ENV_REGISTRY_ENDPOINT: &str = "SUITEGUARD_REGISTRY_ENDPOINT";

/// Attach the suite context to every command `runner` executes.
pub fn with_context(runner: ProcessRunner, ctx: &SuiteContext) -> ProcessRunner {
    runner
        .env(ENV_RUN_ID, ctx.run_id.to_string())
        .env(ENV_TEST_NAMESPACE, ctx.namespaces.test.as_str())
        .env(ENV_APP_NAMESPACE, ctx.namespaces.application.as_str())
        .env(ENV_APPLICATION_IMAGE, ctx.application_image.as_str())
        .env(ENV_DUMMY_IMAGE, ctx.dummy_image.as_str())
        .kubeconfig(ctx.kubeconfig.as_deref())
}
