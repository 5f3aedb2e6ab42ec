// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The handle every engine operation hangs off.

use crate::error::Result;
use hc_adapters::{CredentialStore, FileCredentialStore, HttpTransport, ReqwestTransport, System};
use hc_core::{Clock, SystemClock};
use hc_storage::Root;
use std::sync::Arc;
use std::time::Duration;

/// Interval between remote status checks while provisioning
pub const DEFAULT_REMOTE_POLL: Duration = Duration::from_secs(1);

/// An opened root plus the collaborators operations need: a clock, the
/// host identity driver configuration is keyed by, and (lazily) the
/// credential store and HTTP transport used by the DIDE driver.
#[derive(Clone)]
pub struct Hipercow<C: Clock = SystemClock> {
    root: Root,
    clock: C,
    hostname: String,
    platform: System,
    credentials: Option<Arc<dyn CredentialStore>>,
    transport: Option<Arc<dyn HttpTransport>>,
    remote_poll: Duration,
}

impl Hipercow<SystemClock> {
    pub fn new(root: Root) -> Self {
        Self {
            root,
            clock: SystemClock,
            hostname: hc_adapters::hostname(),
            platform: System::local(),
            credentials: None,
            transport: None,
            remote_poll: hc_adapters::env::poll_interval().unwrap_or(DEFAULT_REMOTE_POLL),
        }
    }
}

impl<C: Clock> Hipercow<C> {
    pub fn with_clock<D: Clock>(self, clock: D) -> Hipercow<D> {
        Hipercow {
            root: self.root,
            clock,
            hostname: self.hostname,
            platform: self.platform,
            credentials: self.credentials,
            transport: self.transport,
            remote_poll: self.remote_poll,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_platform(mut self, platform: System) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_credentials(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_remote_poll(mut self, interval: Duration) -> Self {
        self.remote_poll = interval;
        self
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Platform local environments are built for
    pub fn platform(&self) -> System {
        self.platform
    }

    pub(crate) fn remote_poll(&self) -> Duration {
        self.remote_poll
    }

    pub fn credential_store(&self) -> Result<Arc<dyn CredentialStore>> {
        match &self.credentials {
            Some(store) => Ok(Arc::clone(store)),
            None => Ok(Arc::new(FileCredentialStore::from_env()?)),
        }
    }

    pub(crate) fn transport(&self) -> Result<Arc<dyn HttpTransport>> {
        match &self.transport {
            Some(transport) => Ok(Arc::clone(transport)),
            None => Ok(Arc::new(ReqwestTransport::new()?)),
        }
    }
}
