//! Suite orchestration -- ordered setup, teardown slot handling, and publishing.
//!
//! The [`SuiteOrchestrator`] owns the collaborators and the suite's single
//! teardown slot. Setup runs a fixed sequence of stages and stops at the
//! first failure; whatever teardown the slot holds at that point is what
//! suite teardown runs.
//!
//! # Setup Order
//!
//! 1. Configure (resolve namespaces, images, cluster access)
//! 2. Provision (slot := environment teardown)
//! 3. Install
//! 4. Precondition (default operator group in the test namespace)
//! 5. Registry (slot := registry teardown)
//! 6. Publish (registry handle into suite state)
//!
//! Step 1 happens in [`SuiteOrchestratorBuilder::build`], before any
//! collaborator is called, so configuration errors never touch resources.
//!
//! Setup runs once per orchestrator. A second call, or a call after suite
//! teardown, fails without touching any collaborator.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use suiteguard_core::collaborator::{
    DynInstaller, DynOperatorGroupClient, DynProvisioner, DynRegistryInitializer,
};
use suiteguard_core::config::{SuiteConfig, TeardownMode};
use suiteguard_core::error::{ConfigError, SetupStage, SuiteError};
use suiteguard_core::metrics as m;
use suiteguard_core::teardown::{Teardown, TeardownSlot};
use suiteguard_core::types::{EnvironmentHandle, RegistryHandle, SuiteContext};

use crate::precondition::{EnsureOutcome, PreconditionEnsurer};
use crate::state::SuiteState;

/// What a successful setup produced.
#[derive(Debug, Clone)]
pub struct SetupSummary {
    pub environment: EnvironmentHandle,
    pub precondition: EnsureOutcome,
    pub registry: RegistryHandle,
    /// Name of the action the teardown slot holds after setup.
    pub teardown: Option<String>,
}

/// Drives suite setup and teardown against the configured collaborators.
pub struct SuiteOrchestrator {
    context: SuiteContext,
    mode: TeardownMode,
    provisioner: Box<dyn DynProvisioner>,
    installer: Box<dyn DynInstaller>,
    operator_groups: Box<dyn DynOperatorGroupClient>,
    registry: Box<dyn DynRegistryInitializer>,
    /// Single "current rollback" slot shared with suite teardown.
    teardown: Arc<TeardownSlot>,
    state: SuiteState,
    environment: Option<EnvironmentHandle>,
    completed: Option<SetupStage>,
    setup_started: bool,
}

impl SuiteOrchestrator {
    /// Start building an orchestrator.
    pub fn builder() -> SuiteOrchestratorBuilder {
        SuiteOrchestratorBuilder::new()
    }

    /// Run suite setup, stages 2 through 6.
    ///
    /// Stops at the first failing stage and returns its error. The teardown
    /// slot then holds the action registered by the last stage that
    /// succeeded (noop if provisioning itself failed).
    ///
    /// # Errors
    ///
    /// Returns the failing stage's [`SuiteError`], with the collaborator's
    /// error as its source. Returns [`SuiteError::AlreadySetUp`] if setup
    /// already ran, and [`SuiteError::TeardownSpent`] if suite teardown
    /// already ran.
    pub async fn setup(&mut self) -> Result<SetupSummary, SuiteError> {
        if self.teardown.is_spent() {
            return Err(SuiteError::TeardownSpent {
                stage: SetupStage::Provision,
            });
        }
        if self.setup_started {
            return Err(SuiteError::AlreadySetUp {
                completed: self.completed.unwrap_or(SetupStage::Configure),
            });
        }
        self.setup_started = true;

        tracing::info!(
            run_id = %self.context.run_id,
            test_namespace = %self.context.namespaces.test,
            app_namespace = %self.context.namespaces.application,
            teardown_mode = %self.mode,
            "suite setup starting"
        );
        let started = Instant::now();

        // 2. Provision
        let provisioned = run_stage(SetupStage::Provision, async {
            self.provisioner
                .provision(&self.context)
                .await
                .map_err(|source| SuiteError::Provision { source })
        })
        .await?;
        self.environment = Some(provisioned.environment.clone());
        self.register(SetupStage::Provision, provisioned.teardown).await?;
        self.completed = Some(SetupStage::Provision);
        let environment = provisioned.environment;

        // 3. Install
        run_stage(SetupStage::Install, async {
            self.installer
                .install(&self.context, &environment)
                .await
                .map_err(|source| SuiteError::Install { source })
        })
        .await?;
        self.completed = Some(SetupStage::Install);

        // 4. Precondition
        let precondition = run_stage(SetupStage::Precondition, async {
            PreconditionEnsurer::new(self.operator_groups.as_ref())
                .ensure(&self.context.namespaces.test)
                .await
                .map_err(SuiteError::from)
        })
        .await?;
        self.completed = Some(SetupStage::Precondition);

        // 5. Registry
        let init = run_stage(SetupStage::Registry, async {
            self.registry
                .initialize(&self.context.namespaces.test, &environment)
                .await
                .map_err(|source| SuiteError::Registry { source })
        })
        .await?;
        self.register(SetupStage::Registry, init.teardown).await?;
        self.completed = Some(SetupStage::Registry);

        // 6. Publish
        self.state.publish(init.handle.clone());
        self.completed = Some(SetupStage::Publish);

        let summary = SetupSummary {
            environment,
            precondition,
            registry: init.handle,
            teardown: self.teardown.current(),
        };
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            registry = %summary.registry.endpoint,
            teardown = summary.teardown.as_deref().unwrap_or("none"),
            "suite setup complete"
        );
        Ok(summary)
    }

    /// Put `teardown` into the slot for `stage`.
    ///
    /// The registry stage composes with the environment teardown in chain
    /// mode; everything else replaces the slot. If suite teardown already
    /// ran, the action is run immediately and setup stops.
    async fn register(&self, stage: SetupStage, teardown: Teardown) -> Result<(), SuiteError> {
        let rejected = match (stage, self.mode) {
            (SetupStage::Registry, TeardownMode::Chain) => {
                let mut pending = Some(teardown);
                self.teardown.replace_with(|previous| match pending.take() {
                    Some(registry) => registry.then(previous),
                    None => previous,
                });
                pending
            }
            _ => self.teardown.try_set(teardown).err(),
        };

        match rejected {
            None => Ok(()),
            Some(late) => {
                tracing::warn!(
                    stage = %stage,
                    teardown = late.name(),
                    "suite teardown already ran, releasing stage resources now"
                );
                late.run().await;
                Err(SuiteError::TeardownSpent { stage })
            }
        }
    }

    /// Run suite teardown.
    ///
    /// Runs whatever the slot holds, at most once per orchestrator, and
    /// clears the published suite state. Returns `true` if this call ran
    /// the action.
    pub async fn teardown(&self) -> bool {
        let action = self.teardown.current();
        let ran = self.teardown.run_once().await;
        if ran {
            metrics::counter!(m::TEARDOWN_RUNS_TOTAL).increment(1);
            tracing::info!(
                action = action.as_deref().unwrap_or("none"),
                "suite teardown complete"
            );
        } else {
            tracing::debug!("suite teardown already ran, skipping");
        }
        self.state.clear();
        ran
    }

    /// Set up, run `body`, and tear down.
    ///
    /// Teardown runs whether setup fails or `body` returns; a setup
    /// failure skips `body` and is returned after teardown.
    ///
    /// # Errors
    ///
    /// Returns the setup error, if any.
    pub async fn run<F, Fut, T>(self, body: F) -> Result<T, SuiteError>
    where
        F: FnOnce(SuiteState) -> Fut,
        Fut: Future<Output = T>,
    {
        self.run_until(std::future::pending(), body).await
    }

    /// Like [`run`](Self::run), but setup is abandoned when `cancel`
    /// completes.
    ///
    /// Abandoning setup drops the in-flight stage (command children are
    /// killed with it) and runs whatever teardown the slot holds. `body`
    /// is not covered; it handles its own interruption.
    ///
    /// # Errors
    ///
    /// Returns the setup error, or [`SuiteError::Interrupted`] naming the
    /// stage that was in progress.
    pub async fn run_until<C, F, Fut, T>(mut self, cancel: C, body: F) -> Result<T, SuiteError>
    where
        C: Future<Output = ()>,
        F: FnOnce(SuiteState) -> Fut,
        Fut: Future<Output = T>,
    {
        let finished = tokio::select! {
            result = self.setup() => Some(result),
            () = cancel => None,
        };
        let setup = finished.unwrap_or_else(|| {
            Err(SuiteError::Interrupted {
                stage: self
                    .completed
                    .and_then(SetupStage::next)
                    .unwrap_or(SetupStage::Provision),
            })
        });

        let result = match setup {
            Ok(_) => Ok(body(self.state.clone()).await),
            Err(e) => {
                tracing::error!(
                    stage = %e.stage(),
                    error = %e,
                    "suite setup failed, running teardown"
                );
                Err(e)
            }
        };
        self.teardown().await;
        result
    }

    /// The resolved suite context.
    pub fn context(&self) -> &SuiteContext {
        &self.context
    }

    /// Teardown composition mode.
    pub fn mode(&self) -> TeardownMode {
        self.mode
    }

    /// The suite's teardown slot.
    pub fn teardown_slot(&self) -> &Arc<TeardownSlot> {
        &self.teardown
    }

    /// State published to test bodies.
    pub fn state(&self) -> &SuiteState {
        &self.state
    }

    /// The provisioned environment, once stage 2 succeeded.
    pub fn environment(&self) -> Option<&EnvironmentHandle> {
        self.environment.as_ref()
    }

    /// The last setup stage that completed.
    pub fn completed_stage(&self) -> Option<SetupStage> {
        self.completed
    }
}

impl std::fmt::Debug for SuiteOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteOrchestrator")
            .field("context", &self.context)
            .field("mode", &self.mode)
            .field("teardown", &self.teardown)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

/// Run one setup stage with timing, logging, and failure metrics.
async fn run_stage<T, Fut>(stage: SetupStage, fut: Fut) -> Result<T, SuiteError>
where
    Fut: Future<Output = Result<T, SuiteError>>,
{
    tracing::info!(stage = %stage, "setup stage starting");
    let started = Instant::now();
    let result = fut.await;
    let elapsed = started.elapsed();

    let outcome = if result.is_ok() { "success" } else { "failure" };
    metrics::histogram!(
        m::SUITE_STAGE_DURATION_SECONDS,
        m::LABEL_STAGE => stage.as_str(),
        m::LABEL_RESULT => outcome
    )
    .record(elapsed.as_secs_f64());

    match &result {
        Ok(_) => tracing::info!(
            stage = %stage,
            elapsed_ms = elapsed.as_millis() as u64,
            "setup stage complete"
        ),
        Err(e) => {
            metrics::counter!(m::SUITE_SETUP_FAILURES_TOTAL, m::LABEL_STAGE => stage.as_str())
                .increment(1);
            tracing::error!(stage = %stage, error = %e, "setup stage failed");
        }
    }
    result
}

/// Builder for [`SuiteOrchestrator`].
///
/// `build` resolves the configuration (setup stage 1) and fails before
/// any collaborator is touched.
pub struct SuiteOrchestratorBuilder {
    config: SuiteConfig,
    provisioner: Option<Box<dyn DynProvisioner>>,
    installer: Option<Box<dyn DynInstaller>>,
    operator_groups: Option<Box<dyn DynOperatorGroupClient>>,
    registry: Option<Box<dyn DynRegistryInitializer>>,
    state: Option<SuiteState>,
}

impl SuiteOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            config: SuiteConfig::default(),
            provisioner: None,
            installer: None,
            operator_groups: None,
            registry: None,
            state: None,
        }
    }

    pub fn config(mut self, config: SuiteConfig) -> Self {
        self.config = config;
        self
    }

    pub fn provisioner(mut self, provisioner: impl DynProvisioner + 'static) -> Self {
        self.provisioner = Some(Box::new(provisioner));
        self
    }

    pub fn installer(mut self, installer: impl DynInstaller + 'static) -> Self {
        self.installer = Some(Box::new(installer));
        self
    }

    pub fn operator_group_client(mut self, client: impl DynOperatorGroupClient + 'static) -> Self {
        self.operator_groups = Some(Box::new(client));
        self
    }

    pub fn registry_initializer(
        mut self,
        initializer: impl DynRegistryInitializer + 'static,
    ) -> Self {
        self.registry = Some(Box::new(initializer));
        self
    }

    /// Publish into `state` instead of a fresh one.
    ///
    /// Pass [`crate::state::suite_state`]`().clone()` to share the
    /// process-wide state with test bodies.
    pub fn state(mut self, state: SuiteState) -> Self {
        self.state = Some(state);
        self
    }

    /// Resolve the configuration and assemble the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Config`] if the configuration is invalid or a
    /// collaborator was not supplied.
    pub fn build(self) -> Result<SuiteOrchestrator, SuiteError> {
        let started = Instant::now();
        let resolved = self
            .config
            .resolve()
            .and_then(|context| Ok((context, self.config.teardown_mode()?)));
        let outcome = if resolved.is_ok() { "success" } else { "failure" };
        metrics::histogram!(
            m::SUITE_STAGE_DURATION_SECONDS,
            m::LABEL_STAGE => SetupStage::Configure.as_str(),
            m::LABEL_RESULT => outcome
        )
        .record(started.elapsed().as_secs_f64());

        let (context, mode) = resolved.inspect_err(|e| {
            metrics::counter!(
                m::SUITE_SETUP_FAILURES_TOTAL,
                m::LABEL_STAGE => SetupStage::Configure.as_str()
            )
            .increment(1);
            tracing::error!(stage = %SetupStage::Configure, error = %e, "setup stage failed");
        })?;

        let orchestrator = SuiteOrchestrator {
            context,
            mode,
            provisioner: required(self.provisioner, "provisioner")?,
            installer: required(self.installer, "installer")?,
            operator_groups: required(self.operator_groups, "operator_group_client")?,
            registry: required(self.registry, "registry_initializer")?,
            teardown: Arc::new(TeardownSlot::new()),
            state: self.state.unwrap_or_default(),
            environment: None,
            completed: Some(SetupStage::Configure),
            setup_started: false,
        };

        tracing::debug!(run_id = %orchestrator.context.run_id, "suite orchestrator built");
        Ok(orchestrator)
    }
}

impl Default for SuiteOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, SuiteError> {
    value.ok_or_else(|| {
        ConfigError::InvalidValue {
            field: field.to_owned(),
            reason: "collaborator not supplied".to_owned(),
        }
        .into()
    })
}
