// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hc-engine: Everything `hipercow` does with a root.
//!
//! [`Hipercow`] wraps an opened [`hc_storage::Root`] and carries the
//! operations: task creation, evaluation and waiting, drivers, environments
//! and provisioning, bundles and bulk creation. The batch scripts run on
//! cluster nodes are generated here too.

pub mod batch;
mod bundle;
mod context;
pub mod driver;
mod environment;
mod error;
mod provision;
mod task;
pub mod template;
mod wait;

#[cfg(test)]
mod test_helpers;

pub use bundle::{bulk_create_shell_commands, bulk_data_combine, bulk_data_csv, BulkRow};
pub use context::{Hipercow, DEFAULT_REMOTE_POLL};
pub use driver::{
    check_credentials, ConfigureOutcome, DideConfig, DideDriver, DideOptions, Driver, DriverConfig,
    ExampleConfig, ExampleDriver, DRIVERS,
};
pub use environment::{
    environment_engine, EnvironmentOutcome, DEFAULT_ENVIRONMENT, EMPTY_ENVIRONMENT,
};
pub use error::{EngineError, ErrorKind, Result};
pub use provision::provision_run;
pub use task::TaskCreateOptions;
pub use wait::{Poller, Tick, WaitOptions, WaitOutcome, DEFAULT_WAIT_INTERVAL};
