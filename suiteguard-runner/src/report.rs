//! Report target selection.
//!
//! With `report.junit_dir` set, the suite writes a JUnit report per
//! parallel node; otherwise results go to the console only.

use std::path::PathBuf;

use suiteguard_core::config::ReportConfig;

/// Where suite results are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    Console,
    /// JUnit XML report at this path, in addition to the console.
    JUnit(PathBuf),
}

impl ReportTarget {
    /// Select the target from the `[report]` section.
    pub fn from_config(config: &ReportConfig) -> Self {
        if config.junit_dir.is_empty() {
            return Self::Console;
        }
        let file = format!("junit_e2e_{:02}.xml", config.parallel_node);
        Self::JUnit(PathBuf::from(&config.junit_dir).join(file))
    }

    /// The JUnit report path, if any.
    pub fn junit_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Console => None,
            Self::JUnit(path) => Some(path),
        }
    }
}
