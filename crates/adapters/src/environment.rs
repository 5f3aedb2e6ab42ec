// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment engines: how a named environment's contents are created,
//! provisioned and activated for a running task.
//!
//! Provisioning output goes to a log file rather than the console so that
//! the same code runs unchanged on a cluster node.

use crate::host::System;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("unknown environment engine '{0}'")]
    UnknownEngine(String),
    #[error("Can't provision an empty environment!")]
    EmptyProvision,
    #[error("Can't determine install command")]
    NoInstallCommand,
    #[error("Expected first element of 'cmd' to be 'pip'")]
    NotPip,
    #[error("failed to run '{command}': {source}")]
    Spawn { command: String, source: std::io::Error },
    #[error("'{command}' failed with exit code {code}")]
    Failed { command: String, code: i32 },
    #[error("io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

/// Where an engine works: the project it installs from and the environment
/// directory it installs into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineContext {
    /// Project root; install commands run here
    pub project: PathBuf,
    /// `env/<name>/contents`
    pub contents: PathBuf,
    /// Platform the environment is built for
    pub platform: System,
}

#[async_trait]
pub trait EnvironmentEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Directory holding the built environment
    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    async fn create(&self, log: &Path) -> Result<(), EnvironmentError>;

    /// Resolve the install command; an empty `cmd` asks the engine to pick one
    fn check_args(&self, cmd: &[String]) -> Result<Vec<String>, EnvironmentError>;

    async fn provision(&self, cmd: &[String], log: &Path) -> Result<(), EnvironmentError>;

    /// Variables that activate the environment for a task
    fn envvars(&self) -> BTreeMap<String, String>;
}

/// Engine registered under `name`
pub fn engine_for(
    name: &str,
    context: EngineContext,
) -> Result<Box<dyn EnvironmentEngine>, EnvironmentError> {
    match name {
        "empty" => Ok(Box::new(EmptyEngine)),
        "pip" => Ok(Box::new(PipEngine::new(context))),
        other => Err(EnvironmentError::UnknownEngine(other.to_string())),
    }
}

/// The implicit environment: nothing to build, nothing to activate
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEngine;

#[async_trait]
impl EnvironmentEngine for EmptyEngine {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn path(&self) -> PathBuf {
        PathBuf::new()
    }

    fn exists(&self) -> bool {
        true
    }

    async fn create(&self, _log: &Path) -> Result<(), EnvironmentError> {
        Ok(())
    }

    fn check_args(&self, _cmd: &[String]) -> Result<Vec<String>, EnvironmentError> {
        Err(EnvironmentError::EmptyProvision)
    }

    async fn provision(&self, _cmd: &[String], _log: &Path) -> Result<(), EnvironmentError> {
        Err(EnvironmentError::EmptyProvision)
    }

    fn envvars(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

/// A Python virtualenv per platform, under `contents/venv-<platform>`
#[derive(Debug, Clone)]
pub struct PipEngine {
    context: EngineContext,
}

impl PipEngine {
    pub fn new(context: EngineContext) -> Self {
        Self { context }
    }

    fn bin_dir(&self) -> PathBuf {
        let bin = if self.context.platform == System::Windows { "Scripts" } else { "bin" };
        self.path().join(bin)
    }

    fn python(&self) -> &'static str {
        if self.context.platform == System::Windows {
            "python"
        } else {
            "python3"
        }
    }
}

#[async_trait]
impl EnvironmentEngine for PipEngine {
    fn name(&self) -> &'static str {
        "pip"
    }

    fn path(&self) -> PathBuf {
        self.context.contents.join(format!("venv-{}", self.context.platform))
    }

    fn exists(&self) -> bool {
        self.path().is_dir()
    }

    async fn create(&self, log: &Path) -> Result<(), EnvironmentError> {
        let venv = self.path().display().to_string();
        let args = vec!["-m".to_string(), "venv".to_string(), venv];
        run_logged(self.python(), &args, &self.context.project, &BTreeMap::new(), log).await
    }

    fn check_args(&self, cmd: &[String]) -> Result<Vec<String>, EnvironmentError> {
        if cmd.is_empty() {
            return auto_install_command(&self.context.project);
        }
        if cmd[0] != "pip" {
            return Err(EnvironmentError::NotPip);
        }
        Ok(cmd.to_vec())
    }

    async fn provision(&self, cmd: &[String], log: &Path) -> Result<(), EnvironmentError> {
        let cmd = self.check_args(cmd)?;
        let pip = self.bin_dir().join("pip").display().to_string();
        run_logged(&pip, &cmd[1..], &self.context.project, &self.envvars(), log).await
    }

    fn envvars(&self) -> BTreeMap<String, String> {
        let bin = self.bin_dir();
        let mut paths = vec![bin];
        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        let path = std::env::join_paths(paths)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| self.bin_dir().display().to_string());
        BTreeMap::from([
            ("VIRTUAL_ENV".to_string(), self.path().display().to_string()),
            ("PATH".to_string(), path),
        ])
    }
}

/// Pick `pip install` arguments from the files in the project root
pub fn auto_install_command(project: &Path) -> Result<Vec<String>, EnvironmentError> {
    let cmd: &[&str] = if project.join("pyproject.toml").exists() {
        &["pip", "install", "--verbose", "."]
    } else if project.join("requirements.txt").exists() {
        &["pip", "install", "--verbose", "-r", "requirements.txt"]
    } else {
        return Err(EnvironmentError::NoInstallCommand);
    };
    Ok(cmd.iter().map(|s| s.to_string()).collect())
}

/// Run `program args` in `cwd`, appending stdout and stderr to `log`
pub async fn run_logged(
    program: &str,
    args: &[String],
    cwd: &Path,
    envs: &BTreeMap<String, String>,
    log: &Path,
) -> Result<(), EnvironmentError> {
    let command = std::iter::once(program).chain(args.iter().map(String::as_str)).collect::<Vec<_>>().join(" ");
    let io = |source| EnvironmentError::Io { path: log.to_path_buf(), source };
    if let Some(parent) = log.parent() {
        std::fs::create_dir_all(parent).map_err(io)?;
    }
    let stdout = OpenOptions::new().create(true).append(true).open(log).map_err(io)?;
    let stderr = stdout.try_clone().map_err(io)?;

    tracing::info!(%command, cwd = %cwd.display(), log = %log.display(), "running environment command");
    let status = tokio::process::Command::new(program)
        .args(args)
        .current_dir(cwd)
        .envs(envs)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .status()
        .await
        .map_err(|source| EnvironmentError::Spawn { command: command.clone(), source })?;

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        tracing::warn!(%command, code, "environment command failed");
        return Err(EnvironmentError::Failed { command, code });
    }
    Ok(())
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
