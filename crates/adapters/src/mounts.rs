// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detection of network shares mounted on this machine

use crate::table::{read_table, TableError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MountError {
    #[error("failed to run '{command}': {source}")]
    Command {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("failed to parse mount output '{0}'")]
    Parse(String),
    #[error("can't map local directory '{0}' to network path")]
    NoMount(PathBuf),
    #[error("more than one plausible mount for local directory '{path}' ({count} found)")]
    AmbiguousMount { path: PathBuf, count: usize },
    #[error("can't resolve {0} on linux node")]
    NoLinuxMountPoint(String),
}

/// A network share mounted locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mount {
    /// Server name, without the `.dide.ic.ac.uk` suffix
    pub host: String,
    /// Share path on the server, `/`-separated, no leading separator
    pub remote: String,
    /// Where the share is mounted on this machine
    pub local: PathBuf,
}

impl Mount {
    pub fn new(host: impl Into<String>, remote: impl Into<String>, local: impl Into<PathBuf>) -> Self {
        Self { host: host.into(), remote: remote.into(), local: local.into() }
    }
}

#[allow(clippy::expect_used)]
static UNIX_MOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^//([^@]*@)?([^/]*)/(.*?)\s+on\s+(.*?) (.+)$")
        .expect("constant regex pattern is valid")
});

/// Enumerate SMB mounts by asking the operating system.
pub fn detect_mounts() -> Result<Vec<Mount>, MountError> {
    let mounts = if cfg!(windows) {
        let csv = run(&["powershell", "-c", "Get-SmbMapping|ConvertTo-CSV"])?;
        parse_windows_mounts(&csv)?
    } else {
        let text = run(&["mount", "-t", unix_smb_mount_type()])?;
        parse_unix_mounts(&text)?
    };
    tracing::debug!(count = mounts.len(), "detected network mounts");
    Ok(mounts)
}

fn run(args: &[&str]) -> Result<String, MountError> {
    let command = args.join(" ");
    let output = std::process::Command::new(args[0])
        .args(&args[1..])
        .output()
        .map_err(|source| MountError::Command { command: command.clone(), source })?;
    if !output.status.success() {
        return Err(MountError::CommandFailed {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub fn unix_smb_mount_type() -> &'static str {
    if cfg!(target_os = "linux") {
        "cifs"
    } else {
        "smbfs"
    }
}

/// Parse the output of `mount -t cifs` (or `smbfs`), one mount per line.
pub fn parse_unix_mounts(text: &str) -> Result<Vec<Mount>, MountError> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).map(parse_unix_mount_entry).collect()
}

/// Parse a line like `//user@host/share/path on /local type cifs (rw)`
pub fn parse_unix_mount_entry(line: &str) -> Result<Mount, MountError> {
    let caps = UNIX_MOUNT_PATTERN.captures(line).ok_or_else(|| MountError::Parse(line.to_string()))?;
    let host = caps.get(2).map_or("", |m| m.as_str());
    let remote = caps.get(3).map_or("", |m| m.as_str());
    let local = caps.get(4).map_or("", |m| m.as_str());
    Ok(Mount::new(clean_dide_hostname(host), remote, local))
}

/// Parse `Get-SmbMapping | ConvertTo-CSV`, keeping mappings with status `OK`.
pub fn parse_windows_mounts(csv: &str) -> Result<Vec<Mount>, MountError> {
    let table = match read_table(csv, true) {
        Ok(table) => table,
        Err(TableError::Empty) => return Ok(Vec::new()),
        Err(e) => return Err(MountError::Parse(e.to_string())),
    };
    let column = |name: &str| table.column(name).ok_or_else(|| MountError::Parse(format!("missing column {name}")));
    let (status, local, remote) = (column("Status")?, column("LocalPath")?, column("RemotePath")?);

    let mut mounts = Vec::new();
    for fields in &table.rows {
        let field = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");
        if field(status) != "OK" {
            continue;
        }
        let unc = field(remote).trim_start_matches('\\');
        let (host, share) = unc.split_once('\\').ok_or_else(|| MountError::Parse(fields.join(",")))?;
        mounts.push(Mount::new(clean_dide_hostname(host), share.replace('\\', "/"), field(local)));
    }
    Ok(mounts)
}

pub fn clean_dide_hostname(host: &str) -> String {
    host.strip_suffix(".dide.ic.ac.uk").unwrap_or(host).to_string()
}

#[cfg(test)]
#[path = "mounts_tests.rs"]
mod tests;
