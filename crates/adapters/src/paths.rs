// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mapping a local project directory onto the path a cluster node sees.
//!
//! A Windows node mounts the share holding the project on a drive letter
//! and then changes into the project's directory on that drive. A Linux
//! node has the same shares mounted at fixed roots.

use crate::mounts::{Mount, MountError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static DRIVE_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]:)[\\/]?$").expect("constant regex pattern is valid"));

/// Host serving personal home directories; always mapped to `Q:`
const HOME_SHARE_HOST: &str = "qdrive";

/// Where a local path lives on the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMap {
    /// The local path that was mapped
    pub path: PathBuf,
    pub mount: Mount,
    /// Drive letter the share is mounted on remotely, e.g. `V:`
    pub drive: String,
    /// `path` relative to the mount's local root, `/`-separated; `.` when equal
    pub relative: String,
}

/// Find the single mount containing `path` and express `path` relative to it.
pub fn remap_path(path: &Path, mounts: &[Mount]) -> Result<PathMap, MountError> {
    let candidates: Vec<&Mount> = mounts.iter().filter(|m| path.starts_with(&m.local)).collect();
    let mount = match candidates.as_slice() {
        [] => return Err(MountError::NoMount(path.to_path_buf())),
        [mount] => *mount,
        many => {
            return Err(MountError::AmbiguousMount { path: path.to_path_buf(), count: many.len() })
        }
    };

    let drive = match mount.local.to_str().and_then(|l| DRIVE_ROOT.captures(l)) {
        Some(caps) => caps[1].to_ascii_uppercase(),
        None if mount.host == HOME_SHARE_HOST => "Q:".to_string(),
        None => "V:".to_string(),
    };

    let parts: Vec<String> = path
        .strip_prefix(&mount.local)
        .unwrap_or(Path::new(""))
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let relative = if parts.is_empty() { ".".to_string() } else { parts.join("/") };

    tracing::debug!(
        path = %path.display(),
        host = %mount.host,
        remote = %mount.remote,
        %drive,
        %relative,
        "mapped local path onto network share"
    );
    Ok(PathMap { path: path.to_path_buf(), mount: mount.clone(), drive, relative })
}

impl PathMap {
    fn relative_parts(&self) -> impl Iterator<Item = &str> {
        self.relative.split('/').filter(|p| !p.is_empty() && *p != ".")
    }

    /// `\\host\share\path`, the share's UNC root
    pub fn unc_share(&self) -> String {
        let share: Vec<&str> = self.mount.remote.split('/').filter(|p| !p.is_empty()).collect();
        format!(r"\\{}\{}", self.mount.host, share.join(r"\"))
    }

    /// UNC path of `file` (relative to the mapped directory, `/`-separated)
    pub fn unc_path(&self, file: &str) -> String {
        let mut out = self.unc_share();
        for part in self.relative_parts().chain(file.split('/').filter(|p| !p.is_empty())) {
            out.push('\\');
            out.push_str(part);
        }
        out
    }

    /// The mapped directory on the remote drive, e.g. `\my\project`
    pub fn windows_path(&self) -> String {
        let parts: Vec<&str> = self.relative_parts().collect();
        format!(r"\{}", parts.join(r"\"))
    }

    pub fn network_share_create(&self) -> String {
        format!("net use {} {} /y", self.drive, self.unc_share())
    }

    pub fn network_share_delete(&self) -> String {
        format!("net use {} /delete /y", self.drive)
    }

    /// The mapped directory as seen from a Linux cluster node.
    ///
    /// Home shares appear under `/didehomes/<user>`; the head-node shares
    /// under `/wpia-hn` and `/wpia-hn2`. Any other host is not mounted there.
    pub fn linux_path(&self) -> Result<String, MountError> {
        let host = self.mount.host.to_ascii_lowercase();
        let remote = self.mount.remote.trim_matches('/');
        let base = match host.as_str() {
            "wpia-san04" | "qdrive" => {
                format!("/didehomes/{}", remote.rsplit('/').next().unwrap_or(remote))
            }
            "wpia-hn" | "wpia-hn.hpc" => format!("/wpia-hn/{remote}"),
            "wpia-hn2" | "wpia-hn2.hpc" => format!("/wpia-hn2/{remote}"),
            _ => return Err(MountError::NoLinuxMountPoint(host)),
        };
        Ok(self.relative_parts().fold(base, |acc, part| format!("{acc}/{part}")))
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
