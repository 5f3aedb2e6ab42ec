// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named groups of tasks

use crate::status::TaskStatus;
use crate::task::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub name: String,
    pub task_ids: Vec<TaskId>,
}

/// Order in which statuses dominate a bundle summary: a bundle is only
/// `Success` when every task is.
const REDUCE_ORDER: [TaskStatus; 6] = [
    TaskStatus::Created,
    TaskStatus::Failure,
    TaskStatus::Cancelled,
    TaskStatus::Running,
    TaskStatus::Submitted,
    TaskStatus::Success,
];

/// Summarise many task statuses as one.
///
/// `Missing` dominates everything. An empty slice reduces to `Missing`.
pub fn reduce_status(statuses: &[TaskStatus]) -> TaskStatus {
    if statuses.is_empty() || statuses.contains(&TaskStatus::Missing) {
        return TaskStatus::Missing;
    }
    REDUCE_ORDER
        .into_iter()
        .find(|s| statuses.contains(s))
        .unwrap_or(TaskStatus::Missing)
}

#[cfg(test)]
#[path = "bundle_tests.rs"]
mod tests;
