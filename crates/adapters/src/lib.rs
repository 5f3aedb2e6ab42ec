// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hc-adapters: Adapters for everything outside the task store

pub mod credentials;
pub mod env;
pub mod environment;
pub mod host;
pub mod mounts;
pub mod paths;
pub mod table;
pub mod web;

pub use credentials::{
    check_username, clear_credentials, load_credentials, store_credentials, stored_credentials,
    CredentialError, CredentialStore, Credentials, FileCredentialStore, PASSWORD_KEY, USERNAME_KEY,
};
pub use environment::{
    engine_for, EmptyEngine, EngineContext, EnvironmentEngine, EnvironmentError, PipEngine,
};
pub use host::{hostname, System};
pub use mounts::{detect_mounts, Mount, MountError};
pub use paths::{remap_path, PathMap};
pub use table::{read_table, Table, TableError};
pub use web::{DideTaskStatus, DideWebClient, HttpTransport, ReqwestTransport, Software, WebError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use credentials::MemoryCredentialStore;
#[cfg(any(test, feature = "test-support"))]
pub use web::FakeTransport;
