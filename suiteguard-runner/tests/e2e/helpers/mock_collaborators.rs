//! Recording mock collaborators.
//!
//! Every mock appends to a shared [`CallLog`] so tests can assert on the
//! exact order of setup calls and teardown actions across collaborators.

use std::sync::{Arc, Mutex};

use suiteguard_core::collaborator::{
    Installer, OperatorGroupClient, Provisioned, Provisioner, RegistryInit, RegistryInitializer,
};
use suiteguard_core::error::BoxError;
use suiteguard_core::teardown::Teardown;
use suiteguard_core::types::{
    EnvironmentHandle, Namespace, OperatorGroup, RegistryHandle, SuiteContext,
};
use tokio::sync::Notify;

pub const MOCK_ENVIRONMENT: &str = "mock-env";
pub const MOCK_ENDPOINT: &str = "localhost:5000";

/// Ordered record of collaborator calls and teardown runs.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

#[allow(dead_code)]
impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Number of entries equal to `entry`.
    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }

    /// Entries starting with `teardown:`, in order.
    pub fn teardowns(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.starts_with("teardown:"))
            .cloned()
            .collect()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.count(entry) > 0
    }
}

fn recording_teardown(name: &str, log: &CallLog) -> Teardown {
    let log = log.clone();
    let entry = format!("teardown:{name}");
    Teardown::new(name, move || async move {
        log.record(entry);
    })
}

// --- Provisioner ---

pub struct MockProvisioner {
    log: CallLog,
    error: Option<String>,
}

impl MockProvisioner {
    pub fn new(log: &CallLog, error: Option<String>) -> Self {
        Self {
            log: log.clone(),
            error,
        }
    }
}

impl Provisioner for MockProvisioner {
    async fn provision(&self, ctx: &SuiteContext) -> Result<Provisioned, BoxError> {
        self.log.record("provision");
        if let Some(error) = &self.error {
            return Err(error.clone().into());
        }
        Ok(Provisioned {
            environment: EnvironmentHandle {
                name: MOCK_ENVIRONMENT.to_owned(),
                kubeconfig: ctx.kubeconfig.clone(),
            },
            teardown: recording_teardown("environment", &self.log),
        })
    }
}

// --- Installer ---

pub struct MockInstaller {
    log: CallLog,
    error: Option<String>,
    gate: Option<Arc<Notify>>,
}

impl MockInstaller {
    pub fn new(log: &CallLog, error: Option<String>) -> Self {
        Self {
            log: log.clone(),
            error,
            gate: None,
        }
    }

    /// Block `install` after recording the call until `gate` is notified.
    pub fn gated(mut self, gate: &Arc<Notify>) -> Self {
        self.gate = Some(Arc::clone(gate));
        self
    }
}

impl Installer for MockInstaller {
    async fn install(
        &self,
        _ctx: &SuiteContext,
        environment: &EnvironmentHandle,
    ) -> Result<(), BoxError> {
        self.log.record(format!("install:{}", environment.name));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.error {
            Some(error) => Err(error.clone().into()),
            None => Ok(()),
        }
    }
}

// --- OperatorGroupClient ---

/// In-memory operator group store shared with the test.
pub type GroupStore = Arc<Mutex<Vec<OperatorGroup>>>;

pub struct MockOperatorGroupClient {
    log: CallLog,
    groups: GroupStore,
    list_error: Option<String>,
    create_error: Option<String>,
}

impl MockOperatorGroupClient {
    pub fn new(
        log: &CallLog,
        groups: &GroupStore,
        list_error: Option<String>,
        create_error: Option<String>,
    ) -> Self {
        Self {
            log: log.clone(),
            groups: Arc::clone(groups),
            list_error,
            create_error,
        }
    }
}

impl OperatorGroupClient for MockOperatorGroupClient {
    async fn list(&self, namespace: &Namespace) -> Result<Vec<OperatorGroup>, BoxError> {
        self.log.record(format!("list:{namespace}"));
        if let Some(error) = &self.list_error {
            return Err(error.clone().into());
        }
        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.namespace == namespace.as_str())
            .cloned()
            .collect())
    }

    async fn create(&self, namespace: &Namespace, group: OperatorGroup) -> Result<(), BoxError> {
        self.log.record(format!("create:{namespace}/{}", group.name));
        if let Some(error) = &self.create_error {
            return Err(error.clone().into());
        }
        self.groups.lock().unwrap().push(group);
        Ok(())
    }
}

// --- RegistryInitializer ---

pub struct MockRegistry {
    log: CallLog,
    error: Option<String>,
}

impl MockRegistry {
    pub fn new(log: &CallLog, error: Option<String>) -> Self {
        Self {
            log: log.clone(),
            error,
        }
    }
}

impl RegistryInitializer for MockRegistry {
    async fn initialize(
        &self,
        namespace: &Namespace,
        _environment: &EnvironmentHandle,
    ) -> Result<RegistryInit, BoxError> {
        self.log.record(format!("registry:{namespace}"));
        if let Some(error) = &self.error {
            return Err(error.clone().into());
        }
        Ok(RegistryInit {
            handle: RegistryHandle {
                endpoint: MOCK_ENDPOINT.to_owned(),
                namespace: namespace.clone(),
            },
            teardown: recording_teardown("registry", &self.log),
        })
    }
}
