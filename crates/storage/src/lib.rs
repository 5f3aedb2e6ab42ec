// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hc-storage: Filesystem persistence for a hipercow root.
//!
//! Everything lives under `<project>/hipercow/` as plain files. There is no
//! locking: ids are random, status transitions are single marker-file
//! creations, and records are written via a temp file plus rename.

mod bundles;
mod config;
mod environments;
mod error;
mod fsutil;
mod recent;
mod root;
mod tasks;

pub use environments::{EnvironmentConfig, ENVIRONMENT_CONFIG_VERSION};
pub use error::StorageError;
pub use root::{InitOutcome, Root, MARKER_DIR};

pub type Result<T, E = StorageError> = std::result::Result<T, E>;
