// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::task::{TaskData, TaskId};

/// A shell task running `cmd` from the project root
pub fn shell_task(cmd: &[&str]) -> TaskData {
    TaskData::shell(TaskId::new(), cmd.iter().map(|s| s.to_string()).collect(), "")
}

/// Proptest strategies for core types.
pub mod strategies {
    use crate::status::{TaskStatus, MARKER_PRIORITY};
    use proptest::prelude::*;

    pub fn arb_status() -> impl Strategy<Value = TaskStatus> {
        proptest::sample::select(TaskStatus::ALL.to_vec())
    }

    /// Statuses that are persisted as marker files
    pub fn arb_marker_status() -> impl Strategy<Value = TaskStatus> {
        proptest::sample::select(MARKER_PRIORITY.to_vec())
    }
}
