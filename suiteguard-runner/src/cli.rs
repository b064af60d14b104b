//! CLI argument definitions for the suiteguard binary.
//!
//! Uses `clap` v4 derive macros. Flags override both the config file and
//! `SUITEGUARD_*` environment variables.

use std::path::PathBuf;

use clap::Parser;

use suiteguard_core::config::SuiteConfig;
use suiteguard_core::error::SuiteError;

/// End-to-end suite runner.
///
/// Provisions an environment, installs the application under test, makes
/// sure the test namespace has an operator group, starts the auxiliary
/// registry, runs the test command, and tears everything down once.
#[derive(Parser, Debug)]
#[command(name = "suiteguard")]
#[command(version, about, long_about = None)]
pub struct SuiteCli {
    /// Path to a suiteguard.toml configuration file.
    ///
    /// Without it, defaults plus environment variables are used.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the kubeconfig for the test cluster.
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Namespace the tests run in.
    #[arg(long)]
    pub namespace: Option<String>,

    /// Namespace the application under test runs in.
    #[arg(long = "app-namespace", alias = "olm-namespace")]
    pub app_namespace: Option<String>,

    /// Application image to install.
    #[arg(long)]
    pub application_image: Option<String>,

    /// Image the tests treat as an operator.
    #[arg(long)]
    pub dummy_image: Option<String>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration, print it as JSON, and exit.
    #[arg(long)]
    pub validate: bool,

    /// Test command to run between setup and teardown (after `--`).
    #[arg(last = true)]
    pub test_command: Vec<String>,
}

impl SuiteCli {
    /// Load and validate the configuration: flags > environment > file >
    /// defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or the merged result
    /// does not validate.
    pub async fn load_config(&self) -> Result<SuiteConfig, SuiteError> {
        let mut config = match &self.config {
            Some(path) => SuiteConfig::from_file(path).await?,
            None => SuiteConfig::default(),
        };
        config.apply_env_overrides();
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply flag overrides on top of file and environment values.
    pub fn apply_overrides(&self, config: &mut SuiteConfig) {
        let overrides = [
            (&self.kubeconfig, &mut config.cluster.kubeconfig),
            (&self.namespace, &mut config.namespaces.test),
            (&self.app_namespace, &mut config.namespaces.application),
            (&self.application_image, &mut config.images.application),
            (&self.dummy_image, &mut config.images.dummy),
            (&self.log_level, &mut config.general.log_level),
            (&self.log_format, &mut config.general.log_format),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
    }
}
