//! E2E test scenarios.

mod config_error;
mod full_lifecycle;
mod interrupt;
mod setup_reentry;
mod teardown_once;
