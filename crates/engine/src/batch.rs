// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch scripts run by the cluster scheduler.
//!
//! Each script mounts the project's share, changes into the project and
//! calls back into `hipercow` to evaluate one task (or run one
//! provisioning request). Scripts are written next to the task so the
//! node reads them over the same share.

use crate::error::{EngineError, Result};
use crate::template::interpolate;
use hc_adapters::env::HIPERCOW_VERSION;
use hc_adapters::PathMap;
use hc_core::{ProvisionId, TaskId};
use hc_storage::Root;
use std::collections::HashMap;
use std::path::Path;

/// `hipercow` executable on Windows nodes
pub const DEFAULT_WINDOWS_TOOL: &str = r"I:\bootstrap-rs\hipercow.exe";

/// `hipercow` executable on Linux nodes
pub const DEFAULT_LINUX_TOOL: &str = "/wpia-hn/Hipercow/bootstrap-rs/hipercow";

const TASK_RUN_BAT: &str = r#"@ECHO off
REM automatically generated
ECHO generated on host: ${hostname}
ECHO generated on date: ${date}
ECHO hipercow version: ${hipercow_version}
ECHO running on: %COMPUTERNAME%

net use I: \\wpia-hn\hipercow /y

${network_shares_create}

${hipercow_root_drive}
cd ${hipercow_root_path}
ECHO working directory: %CD%

set HIPERCOW_NO_DRIVERS=1
set HIPERCOW_CORES=%CCP_NUMCPUS%

ECHO this is a single task

@REM The quoting here is necessary for paths with spaces.
ECHO on
"${hipercow_tool}" task eval ${task_id} > "hipercow\tasks\${task_id_1}\${task_id_2}\log" 2>&1

@ECHO off
set ErrorCode=%ERRORLEVEL%

if exist hipercow\tasks\${task_id_1}\${task_id_2}\status-success (
  set TaskStatus=0
) else (
  set TaskStatus=1
)

ECHO ERRORLEVEL was %ErrorCode%

ECHO Cleaning up
%SystemDrive%

${network_shares_delete}

net use I: /delete /y

if %ErrorCode% neq 0 (
  ECHO Task failed catastrophically
  EXIT /b %ErrorCode%
)

if %TaskStatus% == 0 (
  ECHO Task completed successfully!
  ECHO Quitting
) else (
  ECHO Task did not complete successfully
  EXIT /b 1
)
"#;

const PROVISION_BAT: &str = r#"@ECHO off
REM automatically generated
ECHO generated on host: ${hostname}
ECHO generated on date: ${date}
ECHO hipercow version: ${hipercow_version}
ECHO running on: %COMPUTERNAME%

net use I: \\wpia-hn\hipercow /y

${network_shares_create}

${hipercow_root_drive}
cd ${hipercow_root_path}
ECHO working directory: %CD%

set HIPERCOW_NO_DRIVERS=1
set HIPERCOW_CORES=%CCP_NUMCPUS%

ECHO this is a provisioning task

ECHO on
"${hipercow_tool}" environment provision-run ${environment_name} ${provision_id}

@ECHO off
set ErrorCode=%ERRORLEVEL%

ECHO ERRORLEVEL was %ErrorCode%

ECHO Cleaning up
%SystemDrive%

${network_shares_delete}

net use I: /delete /y

if %ErrorCode% neq 0 (
  ECHO Provisioning failed
  EXIT /b %ErrorCode%
)

ECHO Provisioning completed successfully!
"#;

const TASK_RUN_SH: &str = r#"#!/bin/bash
# automatically generated

echo generated on host: ${hostname}
echo generated on date: ${date}
echo hipercow version: ${hipercow_version}
echo running on: $(hostname -f)

export PATH=/opt/apps/lmod/lmod/libexec:$PATH
source /opt/apps/lmod/lmod/init/bash
export LMOD_CMD=/opt/apps/lmod/lmod/libexec/lmod
module use /modules-share/modules/all

cd ${hipercow_root_path}
echo working directory: $(pwd)

export HIPERCOW_NO_DRIVERS=1
export HIPERCOW_CORES=$CCP_NUMCPUS

echo this is a single task

${hipercow_tool} task eval --capture ${task_id}

ErrorCode=$?

if [ -f hipercow/tasks/${task_id_1}/${task_id_2}/status-success ]; then
  TaskStatus=0
else
  TaskStatus=1
fi

echo ERRORLEVEL was $ErrorCode

if [ $ErrorCode -ne 0 ]; then
  echo Task failed catastrophically
  exit $ErrorCode
fi

if [ $TaskStatus -eq 0 ]; then
  echo Task completed successfully!
  echo Quitting
else
  echo Task did not complete successfully
  exit 1
fi
"#;

const PROVISION_SH: &str = r#"#!/bin/bash
# automatically generated

echo generated on host: ${hostname}
echo generated on date: ${date}
echo hipercow version: ${hipercow_version}
echo running on: $(hostname -f)

export PATH=/opt/apps/lmod/lmod/libexec:$PATH
source /opt/apps/lmod/lmod/init/bash
export LMOD_CMD=/opt/apps/lmod/lmod/libexec/lmod
module use /modules-share/modules/all

cd ${hipercow_root_path}
echo working directory: $(pwd)

export HIPERCOW_NO_DRIVERS=1
export HIPERCOW_CORES=$CCP_NUMCPUS

echo this is a provisioning task

${hipercow_tool} environment provision-run ${environment_name} ${provision_id}

ErrorCode=$?

echo ERRORLEVEL was $ErrorCode

if [ $ErrorCode -ne 0 ]; then
  echo Provisioning failed
  exit $ErrorCode
fi

echo Provisioning completed successfully!
"#;

/// Where and when a script was generated; echoed into its output
#[derive(Debug, Clone)]
pub struct ScriptMeta {
    pub hostname: String,
    pub date: String,
}

impl ScriptMeta {
    pub fn current() -> Self {
        Self { hostname: hc_adapters::hostname(), date: chrono::Utc::now().to_rfc3339() }
    }
}

fn vars(pairs: &[(&str, String)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn template_data_core(map: &PathMap, tool: &str, meta: &ScriptMeta) -> HashMap<String, String> {
    vars(&[
        ("hostname", meta.hostname.clone()),
        ("date", meta.date.clone()),
        ("hipercow_version", HIPERCOW_VERSION.to_string()),
        ("hipercow_tool", tool.to_string()),
        ("hipercow_root_drive", map.drive.clone()),
        ("hipercow_root_path", map.windows_path()),
        ("network_shares_create", map.network_share_create()),
        ("network_shares_delete", map.network_share_delete()),
    ])
}

fn task_id_vars(id: &TaskId) -> [(&'static str, String); 3] {
    let (first, rest) = id.shard();
    [("task_id", id.to_string()), ("task_id_1", first.to_string()), ("task_id_2", rest.to_string())]
}

pub fn template_data_task_run(
    id: &TaskId,
    map: &PathMap,
    tool: &str,
    meta: &ScriptMeta,
) -> HashMap<String, String> {
    let mut data = template_data_core(map, tool, meta);
    data.extend(task_id_vars(id).into_iter().map(|(k, v)| (k.to_string(), v)));
    data
}

pub fn template_data_provision(
    name: &str,
    id: &ProvisionId,
    map: &PathMap,
    tool: &str,
    meta: &ScriptMeta,
) -> HashMap<String, String> {
    let mut data = template_data_core(map, tool, meta);
    data.insert("environment_name".to_string(), name.to_string());
    data.insert("provision_id".to_string(), id.to_string());
    data
}

fn template_data_core_linux(
    map: &PathMap,
    tool: &str,
    meta: &ScriptMeta,
) -> Result<HashMap<String, String>> {
    Ok(vars(&[
        ("hostname", meta.hostname.clone()),
        ("date", meta.date.clone()),
        ("hipercow_version", HIPERCOW_VERSION.to_string()),
        ("hipercow_tool", tool.to_string()),
        ("hipercow_root_path", map.linux_path()?),
    ]))
}

pub fn template_data_task_run_linux(
    id: &TaskId,
    map: &PathMap,
    tool: &str,
    meta: &ScriptMeta,
) -> Result<HashMap<String, String>> {
    let mut data = template_data_core_linux(map, tool, meta)?;
    data.extend(task_id_vars(id).into_iter().map(|(k, v)| (k.to_string(), v)));
    Ok(data)
}

/// Write the Windows runner for a task; returns its UNC path
pub fn write_batch_task_run(
    root: &Root,
    id: &TaskId,
    map: &PathMap,
    tool: &str,
    meta: &ScriptMeta,
) -> Result<String> {
    let data = template_data_task_run(id, map, tool, meta);
    let path = root.path_task(id).join("task_run.bat");
    write_script(&path, &crlf(&interpolate(TASK_RUN_BAT, &data)))?;
    Ok(map.unc_path(&relative_to_root(root, &path)))
}

/// Write the Windows runner for a provisioning request; returns its UNC path
pub fn write_batch_provision(
    root: &Root,
    name: &str,
    id: &ProvisionId,
    map: &PathMap,
    tool: &str,
    meta: &ScriptMeta,
) -> Result<String> {
    let data = template_data_provision(name, id, map, tool, meta);
    let path = root.path_provision(name, id).join("run.bat");
    write_script(&path, &crlf(&interpolate(PROVISION_BAT, &data)))?;
    Ok(map.unc_path(&relative_to_root(root, &path)))
}

/// Write the Linux runner for a task; returns its path on a Linux node
pub fn write_batch_task_run_linux(
    root: &Root,
    id: &TaskId,
    map: &PathMap,
    tool: &str,
    meta: &ScriptMeta,
) -> Result<String> {
    let data = template_data_task_run_linux(id, map, tool, meta)?;
    let path = root.path_task(id).join("task_run.sh");
    write_script(&path, &interpolate(TASK_RUN_SH, &data))?;
    Ok(format!("{}/{}", data["hipercow_root_path"], relative_to_root(root, &path)))
}

/// Write the Linux runner for a provisioning request; returns its path on a Linux node
pub fn write_batch_provision_linux(
    root: &Root,
    name: &str,
    id: &ProvisionId,
    map: &PathMap,
    tool: &str,
    meta: &ScriptMeta,
) -> Result<String> {
    let mut data = template_data_core_linux(map, tool, meta)?;
    data.insert("environment_name".to_string(), name.to_string());
    data.insert("provision_id".to_string(), id.to_string());
    let path = root.path_provision(name, id).join("run.sh");
    write_script(&path, &interpolate(PROVISION_SH, &data))?;
    Ok(format!("{}/{}", data["hipercow_root_path"], relative_to_root(root, &path)))
}

/// `path` relative to the project root, `/`-separated
fn relative_to_root(root: &Root, path: &Path) -> String {
    let rel = path.strip_prefix(root.path()).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

fn write_script(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(EngineError::io(parent))?;
    }
    std::fs::write(path, contents).map_err(EngineError::io(path))?;
    tracing::debug!(path = %path.display(), "wrote batch script");
    Ok(())
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
