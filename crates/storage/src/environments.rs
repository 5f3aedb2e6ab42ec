// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment configuration and provisioning records

use crate::fsutil::{check_name, check_version, create_exclusive, list_names, read_json, read_json_optional, write_json};
use crate::{Result, Root, StorageError};
use hc_core::{ProvisionId, ProvisioningData, ProvisioningRecord, ProvisioningResult};
use serde::{Deserialize, Serialize};
use std::fs;

pub const ENVIRONMENT_CONFIG_VERSION: u32 = 1;

/// Stored configuration of a named environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(rename = "v")]
    pub version: u32,
    /// Name of the engine that manages this environment, e.g. `pip`
    pub engine: String,
}

impl EnvironmentConfig {
    pub fn new(engine: impl Into<String>) -> Self {
        Self { version: ENVIRONMENT_CONFIG_VERSION, engine: engine.into() }
    }
}

impl Root {
    pub fn environment_create(&self, name: &str, config: &EnvironmentConfig) -> Result<()> {
        check_name("environment", name)?;
        let path = self.path_environment_config(name);
        if path.exists() {
            return Err(StorageError::EnvironmentExists(name.to_string()));
        }
        write_json(&path, config)?;
        tracing::info!(environment = name, engine = %config.engine, "created environment");
        Ok(())
    }

    /// Configuration of an environment, or `None` if it was never created
    pub fn environment_config(&self, name: &str) -> Result<Option<EnvironmentConfig>> {
        check_name("environment", name)?;
        let path = self.path_environment_config(name);
        let config: Option<EnvironmentConfig> = read_json_optional(&path)?;
        if let Some(config) = &config {
            check_version("environment", &path, config.version, ENVIRONMENT_CONFIG_VERSION)?;
        }
        Ok(config)
    }

    pub fn environment_exists(&self, name: &str) -> bool {
        self.path_environment_config(name).exists()
    }

    pub fn environment_list(&self) -> Result<Vec<String>> {
        Ok(list_names(&self.path_environments())?
            .into_iter()
            .filter(|name| self.environment_exists(name))
            .collect())
    }

    /// Remove an environment, its installed contents and its provisioning history
    pub fn environment_delete(&self, name: &str) -> Result<()> {
        check_name("environment", name)?;
        if !self.environment_exists(name) {
            return Err(StorageError::EnvironmentNotFound(name.to_string()));
        }
        let path = self.path_environment(name);
        fs::remove_dir_all(&path).map_err(StorageError::io(&path))?;
        tracing::info!(environment = name, "deleted environment");
        Ok(())
    }

    /// Persist a provisioning request. Each id gets a fresh directory.
    pub fn provision_write_data(&self, data: &ProvisioningData) -> Result<()> {
        let dir = self.path_provision(&data.name, &data.id);
        if let Some(parent) = dir.parent() {
            fs::create_dir_all(parent).map_err(StorageError::io(parent))?;
        }
        fs::create_dir(&dir).map_err(StorageError::io(&dir))?;
        write_json(&self.path_provision_data(&data.name, &data.id), data)
    }

    pub fn provision_data(&self, name: &str, id: &ProvisionId) -> Result<ProvisioningData> {
        let path = self.path_provision_data(name, id);
        if !path.exists() {
            return Err(StorageError::ProvisionNotFound { name: name.to_string(), id: id.to_string() });
        }
        read_json(&path)
    }

    /// Take on request `id` before doing any work for it.
    ///
    /// Only one caller can claim a given request; later callers get
    /// [`StorageError::ProvisionAlreadyRun`].
    pub fn provision_claim(&self, name: &str, id: &ProvisionId) -> Result<()> {
        if create_exclusive(&self.path_provision_claim(name, id), b"")? {
            Ok(())
        } else {
            Err(StorageError::ProvisionAlreadyRun { name: name.to_string(), id: id.to_string() })
        }
    }

    /// Write the result of a provisioning attempt, exactly once.
    pub fn provision_write_result(
        &self,
        name: &str,
        id: &ProvisionId,
        result: &ProvisioningResult,
    ) -> Result<()> {
        let path = self.path_provision_result(name, id);
        let json = serde_json::to_vec_pretty(result)
            .map_err(|source| StorageError::Json { path: path.clone(), source })?;
        if create_exclusive(&path, &json)? {
            Ok(())
        } else {
            Err(StorageError::ProvisionAlreadyRun { name: name.to_string(), id: id.to_string() })
        }
    }

    pub fn provision_result(&self, name: &str, id: &ProvisionId) -> Result<Option<ProvisioningResult>> {
        read_json_optional(&self.path_provision_result(name, id))
    }

    pub fn provision_has_result(&self, name: &str, id: &ProvisionId) -> bool {
        self.path_provision_result(name, id).exists()
    }

    /// Every provisioning attempt for an environment, oldest first
    pub fn provision_history(&self, name: &str) -> Result<Vec<ProvisioningRecord>> {
        let dir = self.path_environment(name).join("provision");
        let mut records = Vec::new();
        for entry in list_names(&dir)? {
            let Ok(id) = ProvisionId::parse(&entry) else {
                continue;
            };
            if !self.path_provision_data(name, &id).exists() {
                continue;
            }
            let data = self.provision_data(name, &id)?;
            let result = self.provision_result(name, &id)?;
            records.push(ProvisioningRecord { data, result });
        }
        records.sort_by_key(|r| r.data.time_ms);
        Ok(records)
    }
}

#[cfg(test)]
#[path = "environments_tests.rs"]
mod tests;
