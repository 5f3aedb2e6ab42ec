// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output

use crate::prelude::*;

#[test]
fn help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn no_args_shows_usage_and_fails() {
    cli().args(&[]).exits_with(2);
}

#[test]
fn task_help_shows_subcommands() {
    cli()
        .args(&["task", "--help"])
        .passes()
        .stdout_has("create")
        .stdout_has("eval")
        .stdout_has("wait")
        .stdout_has("cancel");
}

#[test]
fn hidden_provision_run_is_not_listed() {
    cli().args(&["environment", "--help"]).passes().stdout_has("provision").stdout_lacks("provision-run");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("hipercow 0.2");
}
