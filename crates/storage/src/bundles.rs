// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bundles: one file per bundle, one task id per line

use crate::fsutil::{check_name, list_names, write_atomic};
use crate::{Result, Root, StorageError};
use hc_core::{Bundle, TaskId};
use std::fs;

impl Root {
    pub fn bundle_save(&self, bundle: &Bundle, overwrite: bool) -> Result<()> {
        check_name("bundle", &bundle.name)?;
        let path = self.path_bundle(&bundle.name);
        if !overwrite && path.exists() {
            return Err(StorageError::BundleExists(bundle.name.clone()));
        }
        let contents: String = bundle.task_ids.iter().map(|id| format!("{id}\n")).collect();
        write_atomic(&path, contents.as_bytes())?;
        tracing::info!(bundle = %bundle.name, tasks = bundle.task_ids.len(), "saved bundle");
        Ok(())
    }

    pub fn bundle_load(&self, name: &str) -> Result<Bundle> {
        check_name("bundle", name)?;
        let path = self.path_bundle(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::BundleNotFound(name.to_string()))
            }
            Err(e) => return Err(StorageError::io(path)(e)),
        };
        let task_ids = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(TaskId::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Bundle { name: name.to_string(), task_ids })
    }

    pub fn bundle_list(&self) -> Result<Vec<String>> {
        list_names(&self.path_bundles())
    }

    /// Remove a bundle. Returns `false` if there was no such bundle.
    pub fn bundle_delete(&self, name: &str) -> Result<bool> {
        check_name("bundle", name)?;
        let path = self.path_bundle(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(path)(e)),
        }
    }
}

#[cfg(test)]
#[path = "bundles_tests.rs"]
mod tests;
