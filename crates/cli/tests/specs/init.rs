// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Creating and finding roots

use crate::prelude::*;

#[test]
fn init_creates_store() {
    let project = Project::empty();
    project.hipercow().args(&["init", "."]).passes().stdout_eq("Initialised hipercow at .\n");
    assert!(project.path().join("hipercow").is_dir());
}

#[test]
fn init_twice_is_harmless() {
    let project = Project::init();
    project.hipercow().args(&["init", "."]).passes().stdout_has("hipercow already initialised at .");
}

#[test]
fn init_refuses_when_a_file_is_in_the_way() {
    let project = Project::empty();
    project.file("hipercow", "not a directory");
    project.hipercow().args(&["init", "."]).fails().stderr_has("rather than directory");
}

#[test]
fn commands_find_the_root_from_a_subdirectory() {
    let project = Project::init();
    project.file("analysis/notes.txt", "");
    project
        .hipercow()
        .in_dir(&project.path().join("analysis"))
        .args(&["driver", "list"])
        .passes()
        .stdout_eq("(none)\n");
}

#[test]
fn commands_outside_a_root_fail() {
    let project = Project::empty();
    project.hipercow().args(&["task", "list"]).fails().stderr_has("couldn't find hipercow root");
}
