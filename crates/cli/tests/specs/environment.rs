// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment management

use crate::prelude::*;

#[test]
fn empty_environment_always_listed() {
    let project = Project::init();
    project.hipercow().args(&["environment", "list"]).passes().stdout_eq("empty\n");
}

#[test]
fn new_list_delete() {
    let project = Project::init();
    project
        .hipercow()
        .args(&["environment", "new"])
        .passes()
        .stdout_eq("Creating environment 'default' using 'pip'\n");
    project
        .hipercow()
        .args(&["environment", "new"])
        .passes()
        .stdout_eq("Environment 'default' already exists\n");
    project.hipercow().args(&["environment", "list"]).passes().stdout_eq("default\nempty\n");

    project
        .hipercow()
        .args(&["environment", "delete", "--name", "default"])
        .passes()
        .stdout_eq("Deleted environment 'default'\n");
    project.hipercow().args(&["environment", "list"]).passes().stdout_eq("empty\n");
}

#[test]
fn reserved_name_cannot_be_created() {
    let project = Project::init();
    project
        .hipercow()
        .args(&["environment", "new", "--name", "empty"])
        .fails()
        .stderr_has("reserved name 'empty'");
}

#[test]
fn unknown_engine_is_rejected() {
    let project = Project::init();
    project
        .hipercow()
        .args(&["environment", "new", "--name", "r", "--engine", "conda"])
        .fails()
        .stderr_has("Unknown environment engine 'conda'");
}

#[test]
fn provisioning_needs_a_driver() {
    let project = Project::init();
    project.hipercow().args(&["environment", "new"]).passes();
    project
        .hipercow()
        .args(&["environment", "provision", "pip", "install", "cowsay"])
        .fails()
        .stderr_has("No driver configured");
}

#[test]
fn provisioning_needs_the_environment() {
    let project = Project::init();
    project.hipercow().args(&["driver", "configure", "example"]).passes();
    project
        .hipercow()
        .args(&["environment", "provision", "--name", "other"])
        .fails()
        .stderr_has("Environment 'other' does not exist");
}

#[test]
fn history_starts_empty() {
    let project = Project::init();
    project.hipercow().args(&["environment", "new"]).passes();
    project
        .hipercow()
        .args(&["environment", "history"])
        .passes()
        .stdout_eq("No provisioning attempts for 'default'\n");
}
