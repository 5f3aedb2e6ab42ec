// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Creating, evaluating and cancelling tasks

use crate::context::Hipercow;
use crate::environment::environment_engine;
use crate::error::{EngineError, Result};
use hc_core::{Clock, TaskData, TaskId, TaskMethod, TaskResources, TaskResult, TaskStatus, TaskTimes};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;

/// Everything about a new task other than its command
#[derive(Debug, Clone, Default)]
pub struct TaskCreateOptions {
    /// Defaults to `default`
    pub environment: Option<String>,
    pub envvars: BTreeMap<String, String>,
    pub resources: Option<TaskResources>,
    /// Driver to submit with; without one the single configured driver is used
    pub driver: Option<String>,
    /// Directory the task runs in; must be inside the root. Defaults to the root.
    pub cwd: Option<PathBuf>,
}

impl TaskCreateOptions {
    hc_core::setters! {
        set {
            envvars: BTreeMap<String, String>,
        }
        option {
            environment: String,
            resources: TaskResources,
            driver: String,
            cwd: PathBuf,
        }
    }
}

impl<C: Clock> Hipercow<C> {
    /// Create a shell task and submit it if a driver is configured.
    ///
    /// Returns once the driver has accepted the task, which is then
    /// `Submitted`. Without a driver the task stays `Created` and can be
    /// run with [`Hipercow::task_eval`].
    pub async fn task_create_shell(&self, cmd: Vec<String>, options: &TaskCreateOptions) -> Result<TaskId> {
        if cmd.is_empty() {
            return Err(EngineError::Validation("'cmd' cannot be empty".to_string()));
        }
        let path = self.relative_path(options.cwd.as_deref())?;
        let environment = self.environment_check(options.environment.as_deref())?;
        let driver = self.load_driver(options.driver.as_deref(), true)?;

        let resources = match &driver {
            Some(driver) => {
                let requested = options.resources.clone().unwrap_or_default();
                Some(driver.resources().validate_resources(&requested)?)
            }
            None => {
                if let Some(resources) = &options.resources {
                    resources.check()?;
                }
                options.resources.clone()
            }
        };

        let id = TaskId::new();
        let mut data = TaskData::shell(id.clone(), cmd, path)
            .environment(environment)
            .envvars(options.envvars.clone());
        data.resources = resources.clone();
        self.root().task_create(&data, self.clock().epoch_ms())?;

        if let Some(driver) = driver {
            driver.submit(&id, &resources.unwrap_or_default(), self.root()).await?;
            self.root().task_set_status(&id, TaskStatus::Submitted)?;
            tracing::info!(task_id = %id, driver = driver.name(), "submitted task");
        }
        Ok(id)
    }

    /// `cwd` relative to the root, `/`-separated; `.` for the root itself
    fn relative_path(&self, cwd: Option<&Path>) -> Result<String> {
        let root = self.root().path();
        let Some(cwd) = cwd else {
            return Ok(".".to_string());
        };
        let cwd = cwd.canonicalize().map_err(EngineError::io(cwd))?;
        let relative = cwd.strip_prefix(root).map_err(|_| {
            EngineError::Validation(format!(
                "Directory '{}' is not within the hipercow root '{}'",
                cwd.display(),
                root.display()
            ))
        })?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Ok(if parts.is_empty() { ".".to_string() } else { parts.join("/") })
    }

    /// Run a task here and now.
    ///
    /// With `capture`, output goes to the task's log file instead of this
    /// process's stdout/stderr. Returns the final status; a command that
    /// fails (or cannot be started) yields `Failure`, not an error.
    pub async fn task_eval(&self, id: &TaskId, capture: bool) -> Result<TaskStatus> {
        let root = self.root();
        let data = root.task_data(id)?;
        let status = root.task_status(id)?;
        if !status.is_runnable() {
            return Err(EngineError::NotRunnable { id: id.clone(), status });
        }
        let created_ms = root.task_times(id)?.created_ms;
        let started_ms = self.clock().epoch_ms();
        root.task_set_status(id, TaskStatus::Running)?;

        let engine = environment_engine(root, &data.environment, self.platform())?;
        let mut envs = engine.envvars();
        envs.extend(data.envvars.clone());
        let cwd = root.path().join(&data.path);
        let log = capture.then(|| root.path_task_log(id));

        let TaskMethod::Shell { cmd } = &data.method;
        tracing::info!(
            task_id = %id,
            cmd = ?cmd,
            cwd = %cwd.display(),
            cores = ?hc_adapters::env::cores(),
            "evaluating task"
        );
        let result = run_shell(cmd, &cwd, &envs, log.as_deref()).await;

        root.task_record_result(id, &result)?;
        root.task_record_times(
            id,
            &TaskTimes { created_ms, started_ms: Some(started_ms), finished_ms: Some(self.clock().epoch_ms()) },
        )?;
        let status = if result.success { TaskStatus::Success } else { TaskStatus::Failure };
        root.task_set_status(id, status)?;
        Ok(status)
    }

    /// Cancel tasks; returns whether each one was cancelled.
    ///
    /// Tasks that were never submitted are cancelled locally. Finished tasks
    /// are left alone. Everything else goes through the driver.
    pub async fn task_cancel(&self, ids: &[TaskId]) -> Result<Vec<(TaskId, bool)>> {
        let root = self.root();
        let mut outcome = Vec::with_capacity(ids.len());
        let mut remote = Vec::new();
        for id in ids {
            match root.task_status(id)? {
                TaskStatus::Missing => return Err(hc_storage::StorageError::TaskNotFound(id.clone()).into()),
                TaskStatus::Created => {
                    root.task_set_status(id, TaskStatus::Cancelled)?;
                    outcome.push((id.clone(), true));
                }
                status if status.is_terminal() => {
                    tracing::debug!(task_id = %id, %status, "not cancelling finished task");
                    outcome.push((id.clone(), false));
                }
                _ => remote.push(id.clone()),
            }
        }
        if !remote.is_empty() {
            let driver = self.load_driver(None, false)?.ok_or(EngineError::NoDriver)?;
            for (id, cancelled) in driver.cancel(&remote, root).await? {
                if cancelled {
                    root.task_set_status(&id, TaskStatus::Cancelled)?;
                }
                outcome.push((id, cancelled));
            }
        }
        Ok(outcome)
    }

    /// The task's captured log, or with `outer` the scheduler's log for it
    pub async fn task_log(&self, id: &TaskId, outer: bool) -> Result<Option<String>> {
        if !outer {
            return Ok(self.root().task_log(id)?);
        }
        if !self.root().task_exists(id) {
            return Err(hc_storage::StorageError::TaskNotFound(id.clone()).into());
        }
        let driver = self.load_driver(None, false)?.ok_or(EngineError::NoDriver)?;
        driver.task_log(id, self.root()).await
    }
}

async fn run_shell(
    cmd: &[String],
    cwd: &Path,
    envs: &BTreeMap<String, String>,
    log: Option<&Path>,
) -> TaskResult {
    let Some((program, args)) = cmd.split_first() else {
        return TaskResult { success: false, output: Some("empty command".to_string()) };
    };
    let mut command = tokio::process::Command::new(program);
    command.args(args).current_dir(cwd).envs(envs).stdin(Stdio::null());
    if let Some(log) = log {
        let redirect = File::create(log).and_then(|out| Ok((out.try_clone()?, out)));
        match redirect {
            Ok((stdout, stderr)) => {
                command.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
            }
            Err(e) => {
                return TaskResult {
                    success: false,
                    output: Some(format!("could not open log {}: {e}", log.display())),
                };
            }
        }
    }
    match command.status().await {
        Ok(status) => {
            tracing::info!(program, %status, "task command finished");
            TaskResult { success: status.success(), output: Some(status.to_string()) }
        }
        Err(e) => {
            tracing::warn!(program, error = %e, "could not start task command");
            TaskResult { success: false, output: Some(format!("could not run '{program}': {e}")) }
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
