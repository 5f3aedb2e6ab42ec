// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioural specs for the `hipercow` binary

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/bundle.rs"]
mod bundle;
#[path = "specs/driver.rs"]
mod driver;
#[path = "specs/environment.rs"]
mod environment;
#[path = "specs/help.rs"]
mod help;
#[path = "specs/init.rs"]
mod init;
#[path = "specs/task.rs"]
mod task;
