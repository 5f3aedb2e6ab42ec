// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task definition and the records written while a task runs

use crate::resources::TaskResources;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

crate::define_id! {
    /// Identifier of a task: 128 random bits as 32 lowercase hex characters.
    pub struct TaskId(16, "task id");
}

/// Schema version of [`TaskData`] records
pub const TASK_DATA_VERSION: u32 = 1;

/// How a task is run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum TaskMethod {
    /// Run a command directly; `cmd[0]` is the program
    Shell { cmd: Vec<String> },
}

impl std::fmt::Display for TaskMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shell { .. } => f.write_str("shell"),
        }
    }
}

/// Immutable task definition, written once at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskData {
    #[serde(rename = "v")]
    pub version: u32,
    pub id: TaskId,
    #[serde(flatten)]
    pub method: TaskMethod,
    /// Working directory relative to the project root, `/`-separated
    pub path: String,
    pub environment: String,
    #[serde(default)]
    pub envvars: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<TaskResources>,
}

impl TaskData {
    pub fn shell(id: TaskId, cmd: Vec<String>, path: impl Into<String>) -> Self {
        Self {
            version: TASK_DATA_VERSION,
            id,
            method: TaskMethod::Shell { cmd },
            path: path.into(),
            environment: "default".to_string(),
            envvars: BTreeMap::new(),
            resources: None,
        }
    }

    crate::setters! {
        into {
            environment: String,
        }
        set {
            envvars: BTreeMap<String, String>,
        }
        option {
            resources: TaskResources,
        }
    }
}

/// Timestamps of a task, in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTimes {
    pub created_ms: u64,
    #[serde(default)]
    pub started_ms: Option<u64>,
    #[serde(default)]
    pub finished_ms: Option<u64>,
}

/// Outcome of evaluating a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub success: bool,
    /// Exit description, e.g. `exit status: 1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
