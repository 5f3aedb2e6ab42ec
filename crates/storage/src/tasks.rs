// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task records and the marker-file status machine

use crate::fsutil::{
    check_version, create_exclusive, created_ms, list_names, modified_ms, read_json,
    read_json_optional, write_atomic, write_json,
};
use crate::{Result, Root, StorageError};
use hc_core::status::{self, MARKER_PRIORITY};
use hc_core::task::TASK_DATA_VERSION;
use hc_core::{StatusMask, TaskData, TaskId, TaskResult, TaskStatus, TaskTimes};
use std::fs;

impl Root {
    /// Write a new task definition and record it in the recent list.
    ///
    /// The task starts with no marker, so it reads back as `Created`.
    pub fn task_create(&self, data: &TaskData, created_ms: u64) -> Result<()> {
        let dir = self.path_task(&data.id);
        if dir.join("data").exists() {
            return Err(StorageError::TaskExists(data.id.clone()));
        }
        fs::create_dir_all(&dir).map_err(StorageError::io(&dir))?;
        write_json(&self.path_task_data(&data.id), data)?;
        write_json(
            &self.path_task_times(&data.id),
            &TaskTimes { created_ms, started_ms: None, finished_ms: None },
        )?;
        self.recent_append(&data.id)?;
        tracing::info!(task_id = %data.id, method = %data.method, "created task");
        Ok(())
    }

    pub fn task_exists(&self, id: &TaskId) -> bool {
        self.path_task_data(id).exists()
    }

    pub fn task_data(&self, id: &TaskId) -> Result<TaskData> {
        let path = self.path_task_data(id);
        if !path.exists() {
            return Err(StorageError::TaskNotFound(id.clone()));
        }
        let data: TaskData = read_json(&path)?;
        check_version("task", &path, data.version, TASK_DATA_VERSION)?;
        Ok(data)
    }

    /// Markers currently present for a task, in priority order
    fn task_markers(&self, id: &TaskId) -> Result<Vec<TaskStatus>> {
        let dir = self.path_task(id);
        Ok(MARKER_PRIORITY
            .into_iter()
            .filter(|s| s.marker().is_some_and(|m| dir.join(m).exists()))
            .collect())
    }

    /// Current status of a task, derived from its marker files
    pub fn task_status(&self, id: &TaskId) -> Result<TaskStatus> {
        if !self.path_task(id).is_dir() {
            return Ok(TaskStatus::Missing);
        }
        let present = self.task_markers(id)?;
        let resolved = status::resolve(&present, self.task_exists(id));
        if present.len() > 1 {
            tracing::warn!(
                task_id = %id,
                markers = ?present,
                resolved = %resolved,
                "task has more than one status marker"
            );
        }
        Ok(resolved)
    }

    /// Move a task to `status` by creating its marker.
    ///
    /// The new marker is written before superseded markers are removed, so a
    /// crash in between leaves extra markers that [`Root::task_status`] still
    /// resolves to the new status.
    pub fn task_set_status(&self, id: &TaskId, status: TaskStatus) -> Result<()> {
        let current = self.task_status(id)?;
        if current == TaskStatus::Missing {
            return Err(StorageError::TaskNotFound(id.clone()));
        }
        if !current.can_advance_to(status) {
            return Err(StorageError::InvalidTransition { id: id.clone(), from: current, to: status });
        }
        let Some(marker) = status.marker() else {
            return Err(StorageError::InvalidTransition { id: id.clone(), from: current, to: status });
        };
        let dir = self.path_task(id);
        create_exclusive(&dir.join(marker), b"")?;
        for old in self.task_markers(id)?.into_iter().filter(|s| *s != status) {
            if let Some(old_marker) = old.marker() {
                if let Err(e) = fs::remove_file(dir.join(old_marker)) {
                    tracing::warn!(task_id = %id, marker = %old, error = %e, "failed to remove superseded status marker");
                }
            }
        }
        tracing::info!(task_id = %id, from = %current, to = %status, "task status changed");
        Ok(())
    }

    pub fn task_record_result(&self, id: &TaskId, result: &TaskResult) -> Result<()> {
        write_json(&self.path_task_result(id), result)
    }

    pub fn task_result(&self, id: &TaskId) -> Result<Option<TaskResult>> {
        read_json_optional(&self.path_task_result(id))
    }

    pub fn task_record_times(&self, id: &TaskId, times: &TaskTimes) -> Result<()> {
        write_json(&self.path_task_times(id), times)
    }

    /// Task timestamps, reconstructed from file times when no record exists.
    pub fn task_times(&self, id: &TaskId) -> Result<TaskTimes> {
        if let Some(times) = read_json_optional(&self.path_task_times(id))? {
            return Ok(times);
        }
        let data = self.path_task_data(id);
        let Some(created) = created_ms(&data) else {
            return Err(StorageError::TaskNotFound(id.clone()));
        };
        let dir = self.path_task(id);
        let marker_time = |s: TaskStatus| s.marker().and_then(|m| modified_ms(&dir.join(m)));
        let finished = [TaskStatus::Success, TaskStatus::Failure, TaskStatus::Cancelled]
            .into_iter()
            .find_map(marker_time);
        Ok(TaskTimes {
            created_ms: created,
            started_ms: marker_time(TaskStatus::Running),
            finished_ms: finished,
        })
    }

    /// Contents of the captured log, if the task has one
    pub fn task_log(&self, id: &TaskId) -> Result<Option<String>> {
        if !self.task_exists(id) {
            return Err(StorageError::TaskNotFound(id.clone()));
        }
        let path = self.path_task_log(id);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path)(e)),
        }
    }

    /// Remember the id a driver's scheduler gave this task (`<driver>_id`)
    pub fn task_set_remote_id(&self, id: &TaskId, driver: &str, remote_id: &str) -> Result<()> {
        write_atomic(&self.path_task(id).join(format!("{driver}_id")), remote_id.as_bytes())
    }

    pub fn task_remote_id(&self, id: &TaskId, driver: &str) -> Result<Option<String>> {
        let path = self.path_task(id).join(format!("{driver}_id"));
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path)(e)),
        }
    }

    /// All tasks with a definition, optionally filtered by status
    pub fn task_list(&self, mask: Option<StatusMask>) -> Result<Vec<TaskId>> {
        let tasks = self.path_tasks();
        let mut ids = Vec::new();
        for head in list_names(&tasks)? {
            for tail in list_names(&tasks.join(&head))? {
                let Ok(id) = TaskId::parse(&format!("{head}{tail}")) else {
                    tracing::debug!(entry = %tasks.join(&head).join(&tail).display(), "skipping unexpected entry in task directory");
                    continue;
                };
                if !self.task_exists(&id) {
                    continue;
                }
                if let Some(mask) = mask {
                    if !mask.contains(self.task_status(&id)?) {
                        continue;
                    }
                }
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
