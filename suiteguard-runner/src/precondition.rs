//! Precondition ensurer -- makes sure the test namespace has an operator group.
//!
//! One list call, at most one create call, no retries. An existing operator
//! group is never touched and a second one is never created, so re-running
//! setup against a prepared namespace is a no-op for this stage.

use suiteguard_core::collaborator::DynOperatorGroupClient;
use suiteguard_core::error::PreconditionError;
use suiteguard_core::metrics as m;
use suiteguard_core::types::{Namespace, OperatorGroup};

/// What [`PreconditionEnsurer::ensure`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The namespace already had operator groups; nothing was written.
    AlreadyPresent { count: usize },
    /// The namespace was empty; the default operator group was created.
    Created { name: String },
}

/// Create-if-absent for the namespace's operator group.
pub struct PreconditionEnsurer<'a> {
    client: &'a dyn DynOperatorGroupClient,
}

impl<'a> PreconditionEnsurer<'a> {
    pub fn new(client: &'a dyn DynOperatorGroupClient) -> Self {
        Self { client }
    }

    /// Ensure `namespace` holds at least one operator group.
    ///
    /// # Errors
    ///
    /// Returns the list failure, or the create failure when the collection
    /// was empty. The collaborator's error is kept as the source.
    pub async fn ensure(&self, namespace: &Namespace) -> Result<EnsureOutcome, PreconditionError> {
        let groups = self
            .client
            .list(namespace)
            .await
            .map_err(|source| PreconditionError::List {
                namespace: namespace.to_string(),
                source,
            })?;

        if !groups.is_empty() {
            tracing::debug!(
                namespace = %namespace,
                count = groups.len(),
                "operator group already present, skipping create"
            );
            return Ok(EnsureOutcome::AlreadyPresent {
                count: groups.len(),
            });
        }

        let group = OperatorGroup::default_for(namespace);
        let name = group.name.clone();
        self.client
            .create(namespace, group)
            .await
            .map_err(|source| PreconditionError::Create {
                namespace: namespace.to_string(),
                name: name.clone(),
                source,
            })?;

        metrics::counter!(m::PRECONDITION_CREATED_TOTAL).increment(1);
        tracing::info!(namespace = %namespace, name = %name, "created default operator group");
        Ok(EnsureOutcome::Created { name })
    }
}
