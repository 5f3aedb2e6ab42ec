// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The hipercow root and the layout of files beneath it

use crate::{Result, StorageError};
use hc_core::{ProvisionId, TaskId};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the directory that marks a project as a hipercow root
pub const MARKER_DIR: &str = "hipercow";

/// Whether [`Root::init`] created the store or found one already there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    Existing,
}

/// An opened hipercow root.
///
/// `path` is the project directory (where tasks' relative working
/// directories are anchored); the store itself is `path/hipercow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    path: PathBuf,
    store: PathBuf,
}

impl Root {
    /// Create the store under `path`. Idempotent.
    pub fn init(path: &Path) -> Result<(Root, InitOutcome)> {
        let store = path.join(MARKER_DIR);
        if store.is_dir() {
            tracing::debug!(path = %store.display(), "hipercow root already exists");
            return Ok((Root::at(path)?, InitOutcome::Existing));
        }
        if store.exists() {
            return Err(StorageError::RootBlocked(store));
        }
        fs::create_dir_all(&store).map_err(StorageError::io(&store))?;
        tracing::info!(path = %store.display(), "initialised hipercow root");
        Ok((Root::at(path)?, InitOutcome::Created))
    }

    /// Find the root containing `start`, ascending through parents.
    pub fn open(start: &Path) -> Result<Root> {
        let start = fs::canonicalize(start).map_err(StorageError::io(start))?;
        start
            .ancestors()
            .find(|dir| dir.join(MARKER_DIR).is_dir())
            .map(|dir| Root { path: dir.to_path_buf(), store: dir.join(MARKER_DIR) })
            .ok_or(StorageError::RootNotFound(start))
    }

    fn at(path: &Path) -> Result<Root> {
        let path = fs::canonicalize(path).map_err(StorageError::io(path))?;
        Ok(Root { store: path.join(MARKER_DIR), path })
    }

    /// The project directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `hipercow/` store directory
    pub fn store(&self) -> &Path {
        &self.store
    }

    pub fn path_tasks(&self) -> PathBuf {
        self.store.join("tasks")
    }

    /// `tasks/<id[0:2]>/<id[2:]>`
    pub fn path_task(&self, id: &TaskId) -> PathBuf {
        let (head, tail) = id.shard();
        self.path_tasks().join(head).join(tail)
    }

    pub fn path_task_data(&self, id: &TaskId) -> PathBuf {
        self.path_task(id).join("data")
    }

    pub fn path_task_times(&self, id: &TaskId) -> PathBuf {
        self.path_task(id).join("times")
    }

    pub fn path_task_result(&self, id: &TaskId) -> PathBuf {
        self.path_task(id).join("result")
    }

    pub fn path_task_log(&self, id: &TaskId) -> PathBuf {
        self.path_task(id).join("log")
    }

    pub fn path_recent(&self) -> PathBuf {
        self.store.join("recent")
    }

    pub fn path_bundles(&self) -> PathBuf {
        self.store.join("bundles")
    }

    pub fn path_bundle(&self, name: &str) -> PathBuf {
        self.path_bundles().join(name)
    }

    pub fn path_environments(&self) -> PathBuf {
        self.store.join("env")
    }

    pub fn path_environment(&self, name: &str) -> PathBuf {
        self.path_environments().join(name)
    }

    pub fn path_environment_config(&self, name: &str) -> PathBuf {
        self.path_environment(name).join("config")
    }

    /// Where an environment engine installs packages
    pub fn path_environment_contents(&self, name: &str) -> PathBuf {
        self.path_environment(name).join("contents")
    }

    pub fn path_provision(&self, name: &str, id: &ProvisionId) -> PathBuf {
        self.path_environment(name).join("provision").join(id.as_str())
    }

    pub fn path_provision_data(&self, name: &str, id: &ProvisionId) -> PathBuf {
        self.path_provision(name, id).join("data")
    }

    pub fn path_provision_result(&self, name: &str, id: &ProvisionId) -> PathBuf {
        self.path_provision(name, id).join("result")
    }

    /// Created by whichever runner takes on a request
    pub fn path_provision_claim(&self, name: &str, id: &ProvisionId) -> PathBuf {
        self.path_provision(name, id).join("running")
    }

    pub fn path_provision_log(&self, name: &str, id: &ProvisionId) -> PathBuf {
        self.path_provision(name, id).join("log")
    }

    /// Driver configuration is per machine, since mounts differ between them
    pub fn path_configuration(&self, hostname: &str) -> PathBuf {
        self.store.join("config").join(hostname)
    }

    pub fn path_driver_configuration(&self, hostname: &str, driver: &str) -> PathBuf {
        self.path_configuration(hostname).join(driver)
    }
}

#[cfg(test)]
#[path = "root_tests.rs"]
mod tests;
