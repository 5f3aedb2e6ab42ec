// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provisioning: installing packages into an environment.
//!
//! A request is recorded under `env/<name>/provision/<id>/data` and then
//! handed to the driver, which eventually calls [`provision_run`] wherever
//! the environment is built. A request is claimed by a single runner before
//! any work starts, and its result is written exactly once.

use crate::context::Hipercow;
use crate::environment::environment_engine;
use crate::error::{EngineError, Result};
use hc_adapters::System;
use hc_core::{Clock, ProvisionId, ProvisioningData, ProvisioningRecord, ProvisioningResult};
use hc_storage::{Root, StorageError};

impl<C: Clock> Hipercow<C> {
    /// Record a provisioning request for `name` and run it through the driver.
    ///
    /// An empty `cmd` lets the environment's engine pick an install command
    /// from the files in the project.
    pub async fn provision(&self, name: &str, cmd: &[String], driver: Option<&str>) -> Result<ProvisionId> {
        let root = self.root();
        if root.environment_config(name)?.is_none() {
            return Err(EngineError::EnvironmentMissing(name.to_string()));
        }
        let driver = self.load_driver(driver, false)?.ok_or(EngineError::NoDriver)?;
        let engine = environment_engine(root, name, self.platform())?;
        let cmd = engine.check_args(cmd)?;

        let id = ProvisionId::new();
        let data = ProvisioningData {
            name: name.to_string(),
            id: id.clone(),
            cmd,
            time_ms: self.clock().epoch_ms(),
        };
        root.provision_write_data(&data)?;
        tracing::info!(environment = name, provision_id = %id, driver = driver.name(), "provisioning");
        driver.provision(name, &id, root).await?;
        Ok(id)
    }

    /// Run a recorded request here; used by batch scripts on cluster nodes
    pub async fn provision_run(&self, name: &str, id: &ProvisionId) -> Result<()> {
        provision_run(self.root(), name, id, self.platform(), self.clock()).await
    }

    pub fn provision_history(&self, name: &str) -> Result<Vec<ProvisioningRecord>> {
        if !self.root().environment_exists(name) {
            return Err(EngineError::EnvironmentMissing(name.to_string()));
        }
        Ok(self.root().provision_history(name)?)
    }
}

/// Build and install into environment `name` according to request `id`.
///
/// Creates the environment's contents first if they are missing. Output of
/// every command goes to the request's log. The outcome, successful or not,
/// is recorded as the request's result.
pub async fn provision_run(
    root: &Root,
    name: &str,
    id: &ProvisionId,
    platform: System,
    clock: &impl Clock,
) -> Result<()> {
    let data = root.provision_data(name, id)?;
    if root.provision_has_result(name, id) {
        return Err(StorageError::ProvisionAlreadyRun { name: name.to_string(), id: id.to_string() }.into());
    }
    let engine = environment_engine(root, name, platform)?;
    root.provision_claim(name, id)?;
    let log = root.path_provision_log(name, id);

    let start_ms = clock.epoch_ms();
    let outcome = async {
        if !engine.exists() {
            tracing::info!(environment = name, path = %engine.path().display(), "creating environment contents");
            engine.create(&log).await?;
        }
        engine.provision(&data.cmd, &log).await
    }
    .await;
    let result = ProvisioningResult {
        error: outcome.as_ref().err().map(ToString::to_string),
        start_ms,
        end_ms: clock.epoch_ms(),
    };
    root.provision_write_result(name, id, &result)?;

    match outcome {
        Ok(()) => {
            tracing::info!(environment = name, provision_id = %id, "provisioning complete");
            Ok(())
        }
        Err(e) => {
            tracing::error!(environment = name, provision_id = %id, error = %e, "provisioning failed");
            Err(EngineError::ProvisionFailed { message: format!("{e} (log: {})", log.display()) })
        }
    }
}

#[cfg(test)]
#[path = "provision_tests.rs"]
mod tests;
