// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waiting for a task to finish

use crate::context::Hipercow;
use crate::error::{EngineError, Result};
use hc_core::{Clock, TaskId, TaskStatus};
use hc_storage::StorageError;
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed-interval poll loop with an optional deadline
pub struct Poller {
    interval: Duration,
    deadline: Option<Instant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Ready,
    Timeout,
}

impl Poller {
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Self {
        Self { interval, deadline: timeout.map(|t| Instant::now() + t) }
    }

    /// Sleep one interval, or until the deadline if that comes first
    pub async fn tick(&mut self) -> Tick {
        let now = Instant::now();
        match self.deadline {
            Some(deadline) if now >= deadline => Tick::Timeout,
            Some(deadline) => {
                tokio::time::sleep_until(deadline.min(now + self.interval)).await;
                Tick::Ready
            }
            None => {
                tokio::time::sleep(self.interval).await;
                Tick::Ready
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub interval: Duration,
    pub timeout: Option<Duration>,
    /// Wait on a task nobody has submitted, e.g. one run by hand elsewhere
    pub allow_created: bool,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self { interval: DEFAULT_WAIT_INTERVAL, timeout: None, allow_created: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Finished(TaskStatus),
    /// The timeout passed first; carries the last status seen
    TimedOut(TaskStatus),
}

impl WaitOutcome {
    pub fn status(self) -> TaskStatus {
        match self {
            WaitOutcome::Finished(s) | WaitOutcome::TimedOut(s) => s,
        }
    }

    pub fn success(self) -> bool {
        self == WaitOutcome::Finished(TaskStatus::Success)
    }
}

impl<C: Clock> Hipercow<C> {
    /// Poll until `id` reaches a terminal status.
    ///
    /// With `follow`, the task's captured log is copied to it as it grows.
    pub async fn task_wait(
        &self,
        id: &TaskId,
        options: &WaitOptions,
        mut follow: Option<&mut dyn Write>,
    ) -> Result<WaitOutcome> {
        let mut status = self.root().task_status(id)?;
        match status {
            TaskStatus::Missing => return Err(StorageError::TaskNotFound(id.clone()).into()),
            s if s.is_terminal() => {
                if let Some(out) = follow.as_deref_mut() {
                    self.follow_log(id, 0, out)?;
                }
                return Ok(WaitOutcome::Finished(s));
            }
            TaskStatus::Created if !options.allow_created => {
                return Err(EngineError::NotSubmitted(id.clone()));
            }
            _ => {}
        }

        let mut poller = Poller::new(options.interval, options.timeout);
        let mut offset = 0;
        let mut last = status;
        tracing::debug!(task_id = %id, %status, "waiting for task");
        loop {
            if let Some(out) = follow.as_deref_mut() {
                offset = self.follow_log(id, offset, out)?;
            }
            status = self.root().task_status(id)?;
            if status != last {
                tracing::info!(task_id = %id, from = %last, to = %status, "task status changed while waiting");
                last = status;
            }
            if status.is_terminal() {
                if let Some(out) = follow.as_deref_mut() {
                    self.follow_log(id, offset, out)?;
                }
                return Ok(WaitOutcome::Finished(status));
            }
            match poller.tick().await {
                Tick::Ready => {}
                Tick::Timeout => return Ok(WaitOutcome::TimedOut(status)),
            }
        }
    }

    /// Copy whatever the log gained since `offset`; returns the new offset
    fn follow_log(&self, id: &TaskId, offset: usize, out: &mut dyn Write) -> Result<usize> {
        let path = self.root().path_task_log(id);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(offset),
            Err(e) => return Err(EngineError::io(path)(e)),
        };
        if let Some(new) = bytes.get(offset..) {
            out.write_all(new).and_then(|()| out.flush()).map_err(EngineError::io(&path))?;
        }
        Ok(offset.max(bytes.len()))
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
