// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use hc_adapters::{CredentialError, EnvironmentError, MountError, WebError};
use hc_core::{IdError, ResourceError, TaskId, TaskStatus};
use hc_storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classes of failure. Nothing is retried automatically, whatever the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; fails before anything is written
    Validation,
    NotFound,
    /// The request conflicts with existing state
    Conflict,
    /// Stored data is unreadable; usually has a rebuild hint
    Corrupt,
    /// The cluster portal answered something unexpected
    Protocol,
    Io,
}

hc_core::simple_display! {
    ErrorKind {
        Validation => "validation",
        NotFound => "not found",
        Conflict => "conflict",
        Corrupt => "corrupt",
        Protocol => "protocol",
        Io => "io",
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Mount(#[from] MountError),
    #[error(transparent)]
    Web(#[from] WebError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Id(#[from] IdError),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Validation(String),
    #[error("No such driver '{0}'")]
    NoSuchDriver(String),
    #[error("Driver '{0}' is not configured")]
    DriverNotConfigured(String),
    #[error("No driver configured")]
    NoDriver,
    #[error("More than one candidate driver: {}", .0.join(", "))]
    AmbiguousDriver(Vec<String>),
    #[error("Driver '{driver}' does not support {operation}")]
    Unsupported { driver: &'static str, operation: &'static str },
    #[error("No such environment '{0}'")]
    NoSuchEnvironment(String),
    #[error("Environment '{0}' does not exist")]
    EnvironmentMissing(String),
    #[error("Can't run '{id}', which has status '{status}'")]
    NotRunnable { id: TaskId, status: TaskStatus },
    #[error("Task '{0}' has not been submitted")]
    NotSubmitted(TaskId),
    #[error("Task '{0}' has no remote job id")]
    NoRemoteId(TaskId),
    #[error("Provisioning failed: {message}")]
    ProvisionFailed { message: String },
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> EngineError {
        let path = path.into();
        move |source| EngineError::Io { path, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Storage(e) if e.is_not_found() => ErrorKind::NotFound,
            EngineError::Storage(e) if e.is_conflict() => ErrorKind::Conflict,
            EngineError::Storage(StorageError::RecentCorrupt { .. })
            | EngineError::Storage(StorageError::Json { .. })
            | EngineError::Storage(StorageError::Version { .. }) => ErrorKind::Corrupt,
            EngineError::Storage(StorageError::RootNotFound(_)) => ErrorKind::NotFound,
            EngineError::Storage(StorageError::InvalidName { .. } | StorageError::Id(_)) => {
                ErrorKind::Validation
            }
            EngineError::Storage(_) | EngineError::Io { .. } => ErrorKind::Io,
            EngineError::Mount(MountError::Command { .. } | MountError::CommandFailed { .. }) => {
                ErrorKind::Io
            }
            EngineError::Web(WebError::Http(_)) => ErrorKind::Io,
            EngineError::Web(_) => ErrorKind::Protocol,
            EngineError::Credential(CredentialError::Io { .. }) => ErrorKind::Io,
            EngineError::Credential(CredentialError::Json { .. }) => ErrorKind::Corrupt,
            EngineError::Credential(CredentialError::Missing) => ErrorKind::NotFound,
            EngineError::Environment(
                EnvironmentError::Spawn { .. }
                | EnvironmentError::Failed { .. }
                | EnvironmentError::Io { .. },
            ) => ErrorKind::Io,
            EngineError::NoSuchDriver(_)
            | EngineError::DriverNotConfigured(_)
            | EngineError::NoDriver
            | EngineError::NoSuchEnvironment(_)
            | EngineError::EnvironmentMissing(_)
            | EngineError::NoRemoteId(_) => ErrorKind::NotFound,
            EngineError::AmbiguousDriver(_)
            | EngineError::NotRunnable { .. }
            | EngineError::NotSubmitted(_) => ErrorKind::Conflict,
            EngineError::ProvisionFailed { .. } => ErrorKind::Io,
            EngineError::Mount(_)
            | EngineError::Credential(_)
            | EngineError::Environment(_)
            | EngineError::Resource(_)
            | EngineError::Id(_)
            | EngineError::Validation(_)
            | EngineError::Unsupported { .. } => ErrorKind::Validation,
        }
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
