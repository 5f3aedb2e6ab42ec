// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;
use std::time::Duration;

/// Version of this tool, reported in generated scripts and to the portal
pub const HIPERCOW_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter for the binary (`HIPERCOW_LOG`, default `warn`)
pub fn log_filter() -> String {
    std::env::var("HIPERCOW_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "warn".to_string())
}

/// Set by generated batch scripts so that evaluating a task on a cluster
/// node never tries to submit it again.
pub fn no_drivers() -> bool {
    std::env::var("HIPERCOW_NO_DRIVERS").is_ok_and(|s| !s.is_empty() && s != "0")
}

/// Cores available to the running task, as exported by the batch script
pub fn cores() -> Option<u32> {
    std::env::var("HIPERCOW_CORES").ok().and_then(|s| s.trim().parse::<u32>().ok())
}

/// Poll interval override for waiting (`HIPERCOW_POLL_MS`)
pub fn poll_interval() -> Option<Duration> {
    std::env::var("HIPERCOW_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Hostname override (`HIPERCOW_HOSTNAME`)
pub fn hostname_override() -> Option<String> {
    std::env::var("HIPERCOW_HOSTNAME").ok().filter(|s| !s.is_empty())
}

/// DIDE credentials from `DIDE_USERNAME` / `DIDE_PASSWORD`, if both are set
pub fn dide_credentials() -> Option<(String, String)> {
    let username = std::env::var("DIDE_USERNAME").ok().filter(|s| !s.is_empty())?;
    let password = std::env::var("DIDE_PASSWORD").ok().filter(|s| !s.is_empty())?;
    Some((username, password))
}

/// Credential file: `HIPERCOW_CREDENTIALS` > `<config dir>/hipercow/credentials.json`
pub fn credentials_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("HIPERCOW_CREDENTIALS") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|dir| dir.join("hipercow").join("credentials.json"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
