//! Binary-level error type and exit code mapping.

use suiteguard_core::error::SuiteError;

use crate::collaborators::CommandError;

/// Everything that can end a `suiteguard` run unsuccessfully.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration could not be loaded or validated.
    #[error("configuration error: {0}")]
    Config(#[source] SuiteError),

    /// A setup stage failed; teardown has already run.
    #[error("suite setup failed at {stage}: {source}", stage = .source.stage())]
    Setup {
        #[source]
        source: SuiteError,
    },

    /// The test command could not be started.
    #[error("test command error: {0}")]
    TestCommand(#[from] CommandError),

    /// The test command ran and failed.
    #[error("test command failed: {0}")]
    TestsFailed(String),

    /// The run was interrupted by a signal; teardown has already run.
    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RunnerError {
    /// Classify a suite error by when it happened.
    pub fn from_suite(err: SuiteError) -> Self {
        match err {
            SuiteError::Config(_) => Self::Config(err),
            SuiteError::Interrupted { .. } => Self::Interrupted,
            other => Self::Setup { source: other },
        }
    }

    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 0    | Success                         |
    /// | 1    | Tests failed / general error    |
    /// | 2    | Configuration error             |
    /// | 3    | Setup failure                   |
    /// | 130  | Interrupted                     |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Setup { .. } => 3,
            Self::Interrupted => 130,
            Self::TestCommand(_) | Self::TestsFailed(_) | Self::Other(_) => 1,
        }
    }
}
