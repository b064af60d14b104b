//! suiteguard runner library.
//!
//! Suite orchestration, the precondition ensurer, suite-scoped state, and
//! the command-backed collaborators used by the `suiteguard` binary. The
//! modules are public so integration tests and embedding harnesses can
//! drive a suite with their own collaborators.

pub mod cli;
pub mod collaborators;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod precondition;
pub mod report;
pub mod state;
pub mod test_command;

pub use error::RunnerError;
pub use orchestrator::{SetupSummary, SuiteOrchestrator, SuiteOrchestratorBuilder};
pub use precondition::{EnsureOutcome, PreconditionEnsurer};
pub use report::ReportTarget;
pub use state::{SuiteState, suite_state};
