// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bundles and bulk creation

use crate::prelude::*;

#[test]
fn bundle_existing_tasks() {
    let project = Project::init();
    let a = project.create_task(&["echo", "a"]);
    let b = project.create_task(&["echo", "b"]);
    project
        .hipercow()
        .args(&["bundle", "create", "--name", "pair", &a, &b])
        .passes()
        .stdout_eq("Created bundle 'pair' with 2 tasks\n");
    project.hipercow().args(&["bundle", "list"]).passes().stdout_eq("pair\n");
    project
        .hipercow()
        .args(&["bundle", "status", "pair"])
        .passes()
        .stdout_eq(&format!("{a} created\n{b} created\n"));
    project.hipercow().args(&["bundle", "status", "pair", "--reduce"]).passes().stdout_eq("created\n");

    project.hipercow().args(&["bundle", "delete", "pair"]).passes().stdout_eq("Deleted bundle 'pair'\n");
    project.hipercow().args(&["bundle", "list"]).passes().stdout_eq("(none)\n");
    project.hipercow().args(&["task", "status", &a]).passes().stdout_eq("created\n");
}

#[test]
fn bundle_of_unknown_task_is_rejected() {
    let project = Project::init();
    project
        .hipercow()
        .args(&["bundle", "create", "0123456789abcdef0123456789abcdef"])
        .fails()
        .stderr_has("does not exist");
}

#[test]
fn bulk_grid_creates_every_combination() {
    let project = Project::init();
    let out = project
        .hipercow()
        .args(&["bulk", "create", "--data", "a=1,2", "--data", "b=x,y,z", "echo", "@{a}", "@{b}"])
        .passes();
    out.stdout_has("with 6 tasks");
    assert_eq!(out.stdout().lines().count(), 7);
}

#[test]
fn bulk_template_must_use_every_name() {
    let project = Project::init();
    project
        .hipercow()
        .args(&["bulk", "create", "--data", "a=1", "--data", "b=2", "echo", "@{a}"])
        .fails()
        .stderr_has("not used in template: b");
    project.hipercow().args(&["task", "list"]).passes().stdout_eq("");
}

#[test]
fn bulk_from_csv() {
    let project = Project::init();
    project.file("params.csv", "alpha,beta\n0.1,1\n0.2,2\n");
    project
        .hipercow()
        .args(&["bulk", "create", "--csv", "params.csv", "--name", "sweep", "fit", "@{alpha}", "@{beta}"])
        .passes()
        .stdout_has("Created bundle 'sweep' with 2 tasks");
}

#[test]
fn bulk_into_existing_bundle_name_fails_without_creating_tasks() {
    let project = Project::init();
    project.hipercow().args(&["bulk", "create", "--name", "once", "--data", "a=1", "echo", "@{a}"]).passes();
    project
        .hipercow()
        .args(&["bulk", "create", "--name", "once", "--data", "a=2", "echo", "@{a}"])
        .fails()
        .stderr_has("bundle 'once' exists");
    let listed = project.hipercow().args(&["task", "list"]).passes().stdout().lines().count();
    assert_eq!(listed, 1);
}
