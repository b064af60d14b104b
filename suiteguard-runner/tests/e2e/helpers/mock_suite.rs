//! Wires recording mocks into a [`SuiteOrchestrator`].

use std::sync::{Arc, Mutex};

use suiteguard_core::config::SuiteConfig;
use suiteguard_core::error::{SetupStage, SuiteError};
use suiteguard_core::types::OperatorGroup;
use suiteguard_runner::{SuiteOrchestrator, SuiteState};
use tokio::sync::Notify;

use super::config::TestConfigBuilder;
use super::mock_collaborators::*;

/// A mock suite with an optional injected failure.
///
/// # Example
///
/// ```ignore
/// let suite = MockSuite::new().fail_at(SetupStage::Install);
/// let mut orchestrator = suite.build().unwrap();
/// ```
#[allow(dead_code)]
pub struct MockSuite {
    pub log: CallLog,
    pub groups: GroupStore,
    pub state: SuiteState,
    /// Releases a gated install; see [`MockSuite::gate_install`].
    pub install_gate: Arc<Notify>,
    config: SuiteConfig,
    gated_install: bool,
    fail_at: Option<SetupStage>,
    fail_list: bool,
}

#[allow(dead_code)]
impl MockSuite {
    pub fn new() -> Self {
        Self {
            log: CallLog::new(),
            groups: Arc::new(Mutex::new(Vec::new())),
            state: SuiteState::new(),
            install_gate: Arc::new(Notify::new()),
            config: TestConfigBuilder::new().build(),
            gated_install: false,
            fail_at: None,
            fail_list: false,
        }
    }

    pub fn config(mut self, config: SuiteConfig) -> Self {
        self.config = config;
        self
    }

    /// Make the collaborator behind `stage` fail.
    ///
    /// For [`SetupStage::Precondition`] the create call fails; use
    /// [`MockSuite::fail_list`] to fail the list call instead.
    pub fn fail_at(mut self, stage: SetupStage) -> Self {
        self.fail_at = Some(stage);
        self
    }

    /// Make `install` wait for [`MockSuite::install_gate`] before returning.
    pub fn gate_install(mut self) -> Self {
        self.gated_install = true;
        self
    }

    pub fn fail_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Seed an existing operator group in `namespace`.
    pub fn with_group(self, name: &str, namespace: &str) -> Self {
        self.groups.lock().unwrap().push(OperatorGroup {
            name: name.to_owned(),
            namespace: namespace.to_owned(),
        });
        self
    }

    fn error_for(&self, stage: SetupStage) -> Option<String> {
        (self.fail_at == Some(stage)).then(|| format!("injected {stage} failure"))
    }

    pub fn build(&self) -> Result<SuiteOrchestrator, SuiteError> {
        let mut installer = MockInstaller::new(&self.log, self.error_for(SetupStage::Install));
        if self.gated_install {
            installer = installer.gated(&self.install_gate);
        }
        let list_error = self
            .fail_list
            .then(|| "injected list failure".to_owned());
        SuiteOrchestrator::builder()
            .config(self.config.clone())
            .provisioner(MockProvisioner::new(
                &self.log,
                self.error_for(SetupStage::Provision),
            ))
            .installer(installer)
            .operator_group_client(MockOperatorGroupClient::new(
                &self.log,
                &self.groups,
                list_error,
                self.error_for(SetupStage::Precondition),
            ))
            .registry_initializer(MockRegistry::new(
                &self.log,
                self.error_for(SetupStage::Registry),
            ))
            .state(self.state.clone())
            .build()
    }
}
