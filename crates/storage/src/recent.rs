// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only index of task ids in creation order

use crate::fsutil::write_atomic;
use crate::{Result, Root, StorageError};
use hc_core::TaskId;
use std::fs;
use std::io::Write;

impl Root {
    pub(crate) fn recent_append(&self, id: &TaskId) -> Result<()> {
        let path = self.path_recent();
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(StorageError::io(&path))?;
        writeln!(file, "{id}").map_err(StorageError::io(&path))
    }

    /// The most recently created tasks, oldest first.
    ///
    /// Every entry is checked; a malformed line means the file was damaged
    /// and the caller is told how to rebuild it.
    pub fn recent(&self, limit: Option<usize>) -> Result<Vec<TaskId>> {
        let path = self.path_recent();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(path)(e)),
        };
        let mut ids = Vec::new();
        for (n, line) in contents.lines().enumerate() {
            if line.len() != TaskId::LEN {
                return Err(StorageError::RecentCorrupt {
                    reason: format!("line {} has length {}, expected {}", n + 1, line.len(), TaskId::LEN),
                });
            }
            let id = TaskId::parse(line).map_err(|e| StorageError::RecentCorrupt {
                reason: format!("line {}: {e}", n + 1),
            })?;
            ids.push(id);
        }
        if let Some(limit) = limit {
            let skip = ids.len().saturating_sub(limit);
            ids.drain(..skip);
        }
        Ok(ids)
    }

    /// The most recently created task
    pub fn last(&self) -> Result<Option<TaskId>> {
        Ok(self.recent(Some(1))?.pop())
    }

    /// Recreate the recent list from every task on disk, ordered by
    /// creation time.
    pub fn recent_rebuild(&self) -> Result<Vec<TaskId>> {
        let mut entries = Vec::new();
        for id in self.task_list(None)? {
            let created = self.task_times(&id)?.created_ms;
            entries.push((created, id));
        }
        entries.sort();
        let ids: Vec<TaskId> = entries.into_iter().map(|(_, id)| id).collect();
        let mut contents = String::new();
        for id in &ids {
            contents.push_str(id);
            contents.push('\n');
        }
        write_atomic(&self.path_recent(), contents.as_bytes())?;
        tracing::info!(count = ids.len(), "rebuilt recent task list");
        Ok(ids)
    }
}

#[cfg(test)]
#[path = "recent_tests.rs"]
mod tests;
