//! Suite-scoped shared state.
//!
//! The registry handle produced during setup is published here so test
//! bodies can reach it. The state is written once by setup and cleared by
//! suite teardown.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use suiteguard_core::types::RegistryHandle;

/// Shared, cloneable view of what suite setup published.
#[derive(Debug, Clone, Default)]
pub struct SuiteState {
    registry: Arc<RwLock<Option<RegistryHandle>>>,
}

impl SuiteState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the registry handle for test bodies.
    pub fn publish(&self, handle: RegistryHandle) {
        let mut slot = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.as_ref() {
            tracing::warn!(
                previous = %previous.endpoint,
                next = %handle.endpoint,
                "registry handle already published, replacing"
            );
        }
        *slot = Some(handle);
    }

    /// The published registry handle, if setup got that far.
    pub fn registry(&self) -> Option<RegistryHandle> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop the published handle at suite end.
    pub fn clear(&self) {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Process-wide suite state shared by the orchestrator and test bodies.
pub fn suite_state() -> &'static SuiteState {
    static STATE: OnceLock<SuiteState> = OnceLock::new();
    STATE.get_or_init(SuiteState::new)
}
