// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task lifecycle status and the marker-file encoding used by the store.
//!
//! A task's status is never written as a value. Each transition drops an
//! empty `status-<name>` marker file into the task directory, and the current
//! status is derived from which markers are present. [`resolve`] is the
//! single place that decides how a set of markers maps to a status.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// No task directory exists for this id
    Missing,
    /// Definition written, nothing else has happened
    Created,
    /// Handed to a driver
    Submitted,
    Running,
    Success,
    Failure,
    Cancelled,
}

crate::simple_display! {
    TaskStatus {
        Missing => "missing",
        Created => "created",
        Submitted => "submitted",
        Running => "running",
        Success => "success",
        Failure => "failure",
        Cancelled => "cancelled",
    }
}

/// Marker lookup order. Terminal markers win over `Running`, which wins over
/// `Submitted`.
pub const MARKER_PRIORITY: [TaskStatus; 5] = [
    TaskStatus::Success,
    TaskStatus::Failure,
    TaskStatus::Cancelled,
    TaskStatus::Running,
    TaskStatus::Submitted,
];

const MARKER_PREFIX: &str = "status-";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusParseError {
    #[error("unknown task status '{0}'")]
    Unknown(String),
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 7] = [
        TaskStatus::Missing,
        TaskStatus::Created,
        TaskStatus::Submitted,
        TaskStatus::Running,
        TaskStatus::Success,
        TaskStatus::Failure,
        TaskStatus::Cancelled,
    ];

    /// Single-bit flag for this status, used by [`StatusMask`]
    pub fn bit(self) -> u8 {
        match self {
            TaskStatus::Missing => 1 << 0,
            TaskStatus::Created => 1 << 1,
            TaskStatus::Submitted => 1 << 2,
            TaskStatus::Running => 1 << 3,
            TaskStatus::Success => 1 << 4,
            TaskStatus::Failure => 1 << 5,
            TaskStatus::Cancelled => 1 << 6,
        }
    }

    pub fn is_terminal(self) -> bool {
        StatusMask::TERMINAL.contains(self)
    }

    pub fn is_runnable(self) -> bool {
        StatusMask::RUNNABLE.contains(self)
    }

    fn rank(self) -> u8 {
        match self {
            TaskStatus::Missing => 0,
            TaskStatus::Created => 1,
            TaskStatus::Submitted => 2,
            TaskStatus::Running => 3,
            TaskStatus::Success | TaskStatus::Failure | TaskStatus::Cancelled => 4,
        }
    }

    /// Whether a task in `self` may move to `next`.
    ///
    /// Status only moves forward; steps may be skipped (a task evaluated
    /// locally goes straight from `Created` to `Running`), but nothing leaves
    /// a terminal state.
    pub fn can_advance_to(self, next: TaskStatus) -> bool {
        self != TaskStatus::Missing && !self.is_terminal() && next.rank() > self.rank()
    }

    /// Marker file name, or `None` for statuses that have no marker
    pub fn marker(self) -> Option<String> {
        match self {
            TaskStatus::Missing | TaskStatus::Created => None,
            s => Some(format!("{MARKER_PREFIX}{s}")),
        }
    }

    /// Inverse of [`TaskStatus::marker`]
    pub fn from_marker(name: &str) -> Option<TaskStatus> {
        let status = name.strip_prefix(MARKER_PREFIX)?.parse::<TaskStatus>().ok()?;
        status.marker().map(|_| status)
    }
}

impl FromStr for TaskStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StatusParseError::Unknown(s.to_string()))
    }
}

/// Derive a status from the markers present in a task directory.
///
/// `exists` is whether the task has a definition. Markers are checked in
/// [`MARKER_PRIORITY`] order so that a task with several markers (left by a
/// crash between writing a new marker and removing the old one) still reports
/// its most advanced state.
pub fn resolve(present: &[TaskStatus], exists: bool) -> TaskStatus {
    MARKER_PRIORITY
        .into_iter()
        .find(|status| present.contains(status))
        .unwrap_or(if exists { TaskStatus::Created } else { TaskStatus::Missing })
}

/// Bit-flag set of statuses, for filtering task listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusMask(u8);

impl StatusMask {
    pub const NONE: StatusMask = StatusMask(0);
    pub const TERMINAL: StatusMask = StatusMask(0b111_0000);
    pub const RUNNABLE: StatusMask = StatusMask(0b000_0110);
    pub const ALL: StatusMask = StatusMask(0b111_1111);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, status: TaskStatus) -> bool {
        self.0 & status.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<TaskStatus> for StatusMask {
    fn from(status: TaskStatus) -> Self {
        StatusMask(status.bit())
    }
}

impl BitOr for StatusMask {
    type Output = StatusMask;

    fn bitor(self, rhs: StatusMask) -> StatusMask {
        StatusMask(self.0 | rhs.0)
    }
}

impl BitOr<TaskStatus> for StatusMask {
    type Output = StatusMask;

    fn bitor(self, rhs: TaskStatus) -> StatusMask {
        StatusMask(self.0 | rhs.bit())
    }
}

impl FromIterator<TaskStatus> for StatusMask {
    fn from_iter<I: IntoIterator<Item = TaskStatus>>(iter: I) -> Self {
        iter.into_iter().fold(StatusMask::NONE, |mask, s| mask | s)
    }
}

/// Parses a comma- or pipe-separated list of statuses, also accepting the
/// group names `terminal`, `runnable` and `all`.
impl FromStr for StatusMask {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = StatusMask::NONE;
        for part in s.split([',', '|']).map(str::trim).filter(|p| !p.is_empty()) {
            mask = mask
                | match part.to_ascii_lowercase().as_str() {
                    "terminal" => StatusMask::TERMINAL,
                    "runnable" => StatusMask::RUNNABLE,
                    "all" => StatusMask::ALL,
                    other => StatusMask::from(other.parse::<TaskStatus>()?),
                };
        }
        if mask.is_empty() {
            return Err(StatusParseError::Unknown(s.to_string()));
        }
        Ok(mask)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
