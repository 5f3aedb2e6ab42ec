// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixtures shared by the unit tests in this crate

use crate::context::Hipercow;
use hc_adapters::{MemoryCredentialStore, System};
use hc_core::FakeClock;
use hc_storage::Root;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const HOSTNAME: &str = "testhost";

pub(crate) struct TestProject {
    pub dir: tempfile::TempDir,
    pub hc: Hipercow<FakeClock>,
    pub clock: FakeClock,
}

impl TestProject {
    pub fn root(&self) -> &Root {
        self.hc.root()
    }
}

/// A fresh root in a temporary directory with a fake clock and no
/// stored credentials
pub(crate) fn project() -> TestProject {
    let dir = tempfile::tempdir().unwrap();
    let (root, _) = Root::init(dir.path()).unwrap();
    let clock = FakeClock::new();
    let hc = Hipercow::new(root)
        .with_clock(clock.clone())
        .with_hostname(HOSTNAME)
        .with_platform(System::local())
        .with_credentials(Arc::new(MemoryCredentialStore::new()))
        .with_remote_poll(Duration::ZERO);
    TestProject { dir, hc, clock }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
