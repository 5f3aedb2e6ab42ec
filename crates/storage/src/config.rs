// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-host driver configuration records.
//!
//! The store does not know driver types; records are opaque serde values
//! keyed by hostname and driver name.

use crate::fsutil::{list_names, read_json_optional, write_json};
use crate::{Result, Root, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;

impl Root {
    pub fn driver_config_save<T: Serialize>(&self, hostname: &str, driver: &str, config: &T) -> Result<()> {
        let path = self.path_driver_configuration(hostname, driver);
        write_json(&path, config)?;
        tracing::info!(hostname, driver, "saved driver configuration");
        Ok(())
    }

    pub fn driver_config_load<T: DeserializeOwned>(&self, hostname: &str, driver: &str) -> Result<Option<T>> {
        read_json_optional(&self.path_driver_configuration(hostname, driver))
    }

    /// Remove a driver's configuration. Returns `false` if it was not configured.
    pub fn driver_config_delete(&self, hostname: &str, driver: &str) -> Result<bool> {
        let path = self.path_driver_configuration(hostname, driver);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(hostname, driver, "removed driver configuration");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(path)(e)),
        }
    }

    /// Names of drivers configured for `hostname`
    pub fn driver_config_list(&self, hostname: &str) -> Result<Vec<String>> {
        list_names(&self.path_configuration(hostname))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
