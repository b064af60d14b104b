//! Configuration errors fail the build before any collaborator runs.

use crate::helpers::config::TestConfigBuilder;
use crate::helpers::mock_suite::MockSuite;

use suiteguard_core::error::{ConfigError, SetupStage, SuiteError};

#[tokio::test]
async fn test_e2e_missing_namespace_touches_nothing() {
    let suite = MockSuite::new().config(TestConfigBuilder::new().test_namespace("").build());

    let err = suite.build().unwrap_err();

    assert!(matches!(
        err,
        SuiteError::Config(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(err.stage(), SetupStage::Configure);
    assert!(suite.log.entries().is_empty());
}

#[tokio::test]
async fn test_e2e_invalid_namespace_name_is_config_error() {
    let suite =
        MockSuite::new().config(TestConfigBuilder::new().app_namespace("Not_Valid").build());

    let err = suite.build().unwrap_err();
    assert!(err.to_string().contains("namespaces.application"));
    assert!(suite.log.entries().is_empty());
}

#[tokio::test]
async fn test_e2e_unknown_teardown_mode_is_config_error() {
    let suite = MockSuite::new().config(TestConfigBuilder::new().teardown_mode("stack").build());

    let err = suite.build().unwrap_err();
    assert!(err.to_string().contains("teardown.mode"));
}

#[tokio::test]
async fn test_e2e_invalid_log_level_is_config_error() {
    let suite = MockSuite::new().config(TestConfigBuilder::new().log_level("loud").build());
    assert!(suite.build().is_err());
}
