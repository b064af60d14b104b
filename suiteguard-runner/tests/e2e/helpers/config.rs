//! Test configuration builder for E2E tests.

use suiteguard_core::config::SuiteConfig;

/// Builder for test-friendly `SuiteConfig` instances.
///
/// Defaults to test namespace `ns-a`, application namespace `olm`, and
/// replace-mode teardown. No commands are configured; E2E tests supply
/// mock collaborators instead.
#[allow(dead_code)]
pub struct TestConfigBuilder {
    config: SuiteConfig,
}

#[allow(dead_code)]
impl TestConfigBuilder {
    pub fn new() -> Self {
        let mut config = SuiteConfig::default();
        config.namespaces.test = "ns-a".to_owned();
        config.namespaces.application = "olm".to_owned();
        Self { config }
    }

    pub fn test_namespace(mut self, namespace: &str) -> Self {
        self.config.namespaces.test = namespace.to_owned();
        self
    }

    pub fn app_namespace(mut self, namespace: &str) -> Self {
        self.config.namespaces.application = namespace.to_owned();
        self
    }

    pub fn teardown_mode(mut self, mode: &str) -> Self {
        self.config.teardown.mode = mode.to_owned();
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.general.log_level = level.to_owned();
        self
    }

    pub fn build(self) -> SuiteConfig {
        self.config
    }
}
