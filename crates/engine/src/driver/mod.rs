// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drivers decide where and how a task runs.
//!
//! A root has zero or more drivers configured per host, each stored as a
//! versioned JSON record under `config/<hostname>/<driver>`. Task creation
//! uses the single configured driver, or none.

mod dide;
mod example;

pub use dide::{check_credentials, DideConfig, DideDriver, DideOptions};
pub use example::{ExampleConfig, ExampleDriver};

use crate::context::Hipercow;
use crate::error::{EngineError, Result};
use async_trait::async_trait;
use hc_adapters::{load_credentials, DideWebClient};
use hc_core::{Clock, ClusterResources, ProvisionId, TaskId, TaskResources};
use hc_storage::{Root, StorageError};
use serde::{Deserialize, Serialize};

/// Schema version of driver configuration records
pub const DRIVER_CONFIG_VERSION: u32 = 1;

/// Names accepted by `driver configure`
pub const DRIVERS: &[&str] = &["example", "dide"];

#[async_trait]
pub trait Driver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Hand a created task to the backend. `resources` are already
    /// validated against [`Driver::resources`].
    async fn submit(&self, id: &TaskId, resources: &TaskResources, root: &Root) -> Result<()>;

    /// Run a recorded provisioning request, returning once it has finished
    async fn provision(&self, name: &str, id: &ProvisionId, root: &Root) -> Result<()>;

    fn resources(&self) -> ClusterResources;

    fn show_configuration(&self) -> String;

    /// Cancel submitted tasks; returns whether each one was cancelled
    async fn cancel(&self, _ids: &[TaskId], _root: &Root) -> Result<Vec<(TaskId, bool)>> {
        Err(EngineError::Unsupported { driver: self.name(), operation: "cancel" })
    }

    /// Scheduler-side log for a task, if the backend keeps one
    async fn task_log(&self, _id: &TaskId, _root: &Root) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Stored configuration of one driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "driver", rename_all = "lowercase")]
pub enum DriverConfig {
    Example(ExampleConfig),
    Dide(DideConfig),
}

impl DriverConfig {
    pub fn name(&self) -> &'static str {
        match self {
            DriverConfig::Example(_) => "example",
            DriverConfig::Dide(_) => "dide",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DriverConfig::Example(config) => config.describe(),
            DriverConfig::Dide(config) => config.describe(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DriverRecord {
    #[serde(rename = "v")]
    version: u32,
    #[serde(flatten)]
    config: DriverConfig,
}

/// Whether configuring replaced an existing record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureOutcome {
    Configured,
    Updated,
}

pub fn check_driver_name(name: &str) -> Result<()> {
    if DRIVERS.contains(&name) {
        Ok(())
    } else {
        Err(EngineError::NoSuchDriver(name.to_string()))
    }
}

impl<C: Clock> Hipercow<C> {
    pub fn driver_configure(&self, config: DriverConfig) -> Result<ConfigureOutcome> {
        let name = config.name();
        let existed = self.root().driver_config_list(self.hostname())?.iter().any(|d| d == name);
        let record = DriverRecord { version: DRIVER_CONFIG_VERSION, config };
        self.root().driver_config_save(self.hostname(), name, &record)?;
        Ok(if existed { ConfigureOutcome::Updated } else { ConfigureOutcome::Configured })
    }

    /// Returns `false` if the driver was not configured
    pub fn driver_unconfigure(&self, name: &str) -> Result<bool> {
        check_driver_name(name)?;
        Ok(self.root().driver_config_delete(self.hostname(), name)?)
    }

    /// Drivers configured for this host
    pub fn driver_list(&self) -> Result<Vec<String>> {
        Ok(self.root().driver_config_list(self.hostname())?)
    }

    fn driver_config_read(&self, name: &str) -> Result<DriverConfig> {
        check_driver_name(name)?;
        let record: DriverRecord = self
            .root()
            .driver_config_load(self.hostname(), name)?
            .ok_or_else(|| EngineError::DriverNotConfigured(name.to_string()))?;
        let path = self.root().path_driver_configuration(self.hostname(), name);
        if record.version != DRIVER_CONFIG_VERSION {
            return Err(StorageError::Version {
                kind: "driver configuration",
                path,
                found: record.version,
                expected: DRIVER_CONFIG_VERSION,
            }
            .into());
        }
        if record.config.name() != name {
            return Err(EngineError::Validation(format!(
                "configuration at {} is for driver '{}'",
                path.display(),
                record.config.name()
            )));
        }
        Ok(record.config)
    }

    /// Pick a driver configuration.
    ///
    /// With `name`, that driver must be configured. Without, the single
    /// configured driver is used; none is an error unless `allow_none`,
    /// several is always an error.
    pub fn driver_select(&self, name: Option<&str>, allow_none: bool) -> Result<Option<DriverConfig>> {
        if let Some(name) = name {
            return self.driver_config_read(name).map(Some);
        }
        let configured = self.driver_list()?;
        match configured.as_slice() {
            [] if allow_none => Ok(None),
            [] => Err(EngineError::NoDriver),
            [only] => self.driver_config_read(only).map(Some),
            _ => Err(EngineError::AmbiguousDriver(configured)),
        }
    }

    /// Instantiate the selected driver.
    ///
    /// `HIPERCOW_NO_DRIVERS` makes this behave as though nothing were
    /// configured, so tasks evaluated on a cluster node are never resubmitted.
    pub fn load_driver(&self, name: Option<&str>, allow_none: bool) -> Result<Option<Box<dyn Driver>>> {
        if hc_adapters::env::no_drivers() {
            tracing::debug!("drivers disabled by HIPERCOW_NO_DRIVERS");
            return if allow_none { Ok(None) } else { Err(EngineError::NoDriver) };
        }
        match self.driver_select(name, allow_none)? {
            Some(config) => self.build_driver(config).map(Some),
            None => Ok(None),
        }
    }

    pub fn build_driver(&self, config: DriverConfig) -> Result<Box<dyn Driver>> {
        match config {
            DriverConfig::Example(config) => {
                Ok(Box::new(ExampleDriver::new(config, self.platform(), self.clock().clone())))
            },
            DriverConfig::Dide(config) => {
                let credentials = load_credentials(self.credential_store()?.as_ref())?;
                let client = DideWebClient::new(self.transport()?, credentials)
                    .with_cluster(config.cluster.clone());
                Ok(Box::new(DideDriver::new(config, client, self.remote_poll())))
            }
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
