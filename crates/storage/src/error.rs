// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use hc_core::{IdError, TaskId, TaskStatus};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or writing the store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported {kind} record version {found} (expected {expected}) at {path}")]
    Version { kind: &'static str, path: PathBuf, found: u32, expected: u32 },
    #[error("couldn't find hipercow root, starting from {0}")]
    RootNotFound(PathBuf),
    #[error("unexpected file 'hipercow' (rather than directory) found at {0}")]
    RootBlocked(PathBuf),
    #[error("task '{0}' does not exist")]
    TaskNotFound(TaskId),
    #[error("task '{0}' already exists")]
    TaskExists(TaskId),
    #[error("can't change status of task '{id}' from '{from}' to '{to}'")]
    InvalidTransition { id: TaskId, from: TaskStatus, to: TaskStatus },
    #[error("recent tasks list is corrupt ({reason}); rebuild it with 'hipercow task recent --rebuild'")]
    RecentCorrupt { reason: String },
    #[error("environment '{0}' does not exist")]
    EnvironmentNotFound(String),
    #[error("environment '{0}' already exists")]
    EnvironmentExists(String),
    #[error("provisioning task '{id}' for '{name}' has already been run")]
    ProvisionAlreadyRun { name: String, id: String },
    #[error("provisioning task '{id}' for '{name}' does not exist")]
    ProvisionNotFound { name: String, id: String },
    #[error("no such bundle '{0}'")]
    BundleNotFound(String),
    #[error("bundle '{0}' exists and overwrite is false")]
    BundleExists(String),
    #[error("invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },
    #[error(transparent)]
    Id(#[from] IdError),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> StorageError {
        let path = path.into();
        move |source| StorageError::Io { path, source }
    }

    /// True for errors that mean the requested item is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::TaskNotFound(_)
                | StorageError::EnvironmentNotFound(_)
                | StorageError::ProvisionNotFound { .. }
                | StorageError::BundleNotFound(_)
        )
    }

    /// True for errors caused by a conflicting existing state
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StorageError::TaskExists(_)
                | StorageError::InvalidTransition { .. }
                | StorageError::EnvironmentExists(_)
                | StorageError::ProvisionAlreadyRun { .. }
                | StorageError::BundleExists(_)
        )
    }
}
