// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Facts about the machine we are running on

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Operating system family, used to pick script dialects and venv layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum System {
    Windows,
    Linux,
    Macos,
}

hc_core::simple_display! {
    System {
        Windows => "windows",
        Linux => "linux",
        Macos => "macos",
    }
}

impl System {
    pub fn local() -> Self {
        if cfg!(windows) {
            System::Windows
        } else if cfg!(target_os = "macos") {
            System::Macos
        } else {
            System::Linux
        }
    }
}

/// Name of this machine; driver configuration is stored per hostname.
///
/// `HIPERCOW_HOSTNAME` > `hostname` command > `HOSTNAME`/`COMPUTERNAME` > `localhost`
pub fn hostname() -> String {
    crate::env::hostname_override().unwrap_or_else(|| machine_hostname().to_string())
}

static MACHINE_HOSTNAME: LazyLock<String> = LazyLock::new(|| {
    let from_command = std::process::Command::new("hostname")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|s| !s.is_empty());
    from_command.unwrap_or_else(|| {
        ["HOSTNAME", "COMPUTERNAME"]
            .into_iter()
            .find_map(|var| std::env::var(var).ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "localhost".to_string())
    })
});

/// Hostname as reported by the system, looked up once per process
pub fn machine_hostname() -> &'static str {
    &MACHINE_HOSTNAME
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
