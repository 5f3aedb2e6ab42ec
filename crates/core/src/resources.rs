// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task resource requests and the cluster limits they are validated against

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("'{0}' must be positive")]
    NotPositive(&'static str),
    #[error("{description} '{name}' is not in valid queue list")]
    InvalidQueue { description: &'static str, name: String },
    #[error("invalid special queue '{0}'")]
    InvalidSpecialQueue(String),
    #[error("{0} is too many cores for this cluster")]
    TooManyCores(u32),
    #[error("{requested}Gb per {per} is too large for this cluster")]
    TooMuchMemory { requested: u32, per: &'static str },
}

/// Resources requested by a single task.
///
/// Memory is in gigabytes and runtime in seconds. A `queue` of `None` means
/// the cluster's default queue; `.default`, `.test` and `.build` name the
/// cluster's aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    pub cores: u32,
    #[serde(default)]
    pub exclusive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_per_node: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_per_task: Option<u32>,
}

impl Default for TaskResources {
    fn default() -> Self {
        Self {
            queue: None,
            cores: 1,
            exclusive: false,
            max_runtime: None,
            memory_per_node: None,
            memory_per_task: None,
        }
    }
}

impl TaskResources {
    crate::setters! {
        set {
            cores: u32,
            exclusive: bool,
        }
        option {
            queue: String,
            max_runtime: u32,
            memory_per_node: u32,
            memory_per_task: u32,
        }
    }

    /// Reject zero-valued requests
    pub fn check(&self) -> Result<(), ResourceError> {
        require_positive(Some(self.cores), "cores")?;
        require_positive(self.max_runtime, "max_runtime")?;
        require_positive(self.memory_per_node, "memory_per_node")?;
        require_positive(self.memory_per_task, "memory_per_task")
    }
}

fn require_positive(value: Option<u32>, name: &'static str) -> Result<(), ResourceError> {
    match value {
        Some(0) => Err(ResourceError::NotPositive(name)),
        _ => Ok(()),
    }
}

/// Queues available on a cluster, with the aliases tasks may refer to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queues {
    pub valid: BTreeSet<String>,
    pub default: String,
    pub build: String,
    pub test: String,
}

impl Queues {
    pub fn new(
        valid: impl IntoIterator<Item = impl Into<String>>,
        default: impl Into<String>,
        build: impl Into<String>,
        test: impl Into<String>,
    ) -> Result<Self, ResourceError> {
        let queues = Self {
            valid: valid.into_iter().map(Into::into).collect(),
            default: default.into(),
            build: build.into(),
            test: test.into(),
        };
        queues.check_queue(&queues.default, "Default queue")?;
        queues.check_queue(&queues.build, "Build queue")?;
        queues.check_queue(&queues.test, "Test queue")?;
        Ok(queues)
    }

    /// A cluster with exactly one queue, used for every alias
    pub fn simple(name: &str) -> Self {
        Self {
            valid: BTreeSet::from([name.to_string()]),
            default: name.to_string(),
            build: name.to_string(),
            test: name.to_string(),
        }
    }

    fn check_queue(&self, name: &str, description: &'static str) -> Result<(), ResourceError> {
        if self.valid.contains(name) {
            Ok(())
        } else {
            Err(ResourceError::InvalidQueue { description, name: name.to_string() })
        }
    }

    /// Resolve a requested queue (possibly an alias) to a concrete queue name
    pub fn validate_queue(&self, name: Option<&str>) -> Result<String, ResourceError> {
        let Some(name) = name else {
            return Ok(self.default.clone());
        };
        if let Some(alias) = name.strip_prefix('.') {
            return match alias {
                "default" => Ok(self.default.clone()),
                "test" => Ok(self.test.clone()),
                "build" => Ok(self.build.clone()),
                _ => Err(ResourceError::InvalidSpecialQueue(name.to_string())),
            };
        }
        self.check_queue(name, "Queue")?;
        Ok(name.to_string())
    }
}

/// Limits a driver reports for its cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterResources {
    pub queues: Queues,
    pub max_cores: u32,
    /// Largest node memory, in gigabytes
    pub max_memory: u32,
}

impl ClusterResources {
    /// Check a request against this cluster, resolving its queue.
    ///
    /// Returns a copy of `resources` whose `queue` is always a concrete,
    /// valid queue name.
    pub fn validate_resources(
        &self,
        resources: &TaskResources,
    ) -> Result<TaskResources, ResourceError> {
        resources.check()?;
        let queue = self.queues.validate_queue(resources.queue.as_deref())?;
        if resources.cores > self.max_cores {
            return Err(ResourceError::TooManyCores(resources.cores));
        }
        check_memory(resources.memory_per_node, self.max_memory, "node")?;
        check_memory(resources.memory_per_task, self.max_memory, "task")?;
        Ok(TaskResources { queue: Some(queue), ..resources.clone() })
    }
}

fn check_memory(requested: Option<u32>, available: u32, per: &'static str) -> Result<(), ResourceError> {
    match requested {
        Some(requested) if requested > available => {
            Err(ResourceError::TooMuchMemory { requested, per })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod tests;
