// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task lifecycle through the binary

use crate::prelude::*;

#[test]
fn create_prints_id_and_leaves_task_created() {
    let project = Project::init();
    let id = project.create_task(&["echo", "hello"]);
    assert_eq!(id.len(), 32);
    project.hipercow().args(&["task", "status", &id]).passes().stdout_eq("created\n");
    project.hipercow().args(&["task", "last"]).passes().stdout_eq(&format!("{id}\n"));
    project.hipercow().args(&["task", "recent"]).passes().stdout_eq(&format!("{id}\n"));
}

#[test]
fn unknown_task_is_missing() {
    let project = Project::init();
    project
        .hipercow()
        .args(&["task", "status", "0123456789abcdef0123456789abcdef"])
        .passes()
        .stdout_eq("missing\n");
}

#[test]
fn create_with_example_driver_submits() {
    let project = Project::init();
    project.hipercow().args(&["driver", "configure", "example"]).passes();
    let id = project.create_task(&["echo", "hello"]);
    project.hipercow().args(&["task", "status", &id]).passes().stdout_eq("submitted\n");
}

#[test]
fn create_in_unknown_environment_fails() {
    let project = Project::init();
    project
        .hipercow()
        .args(&["task", "create", "--environment", "nope", "echo", "hi"])
        .fails()
        .stderr_has("No such environment 'nope'");
}

#[test]
fn waiting_on_an_unsubmitted_task_fails() {
    let project = Project::init();
    let id = project.create_task(&["echo", "hello"]);
    project.hipercow().args(&["task", "wait", &id]).fails().stderr_has("has not been submitted");
}

#[test]
fn wait_times_out_with_exit_code_two() {
    let project = Project::init();
    project.hipercow().args(&["driver", "configure", "example"]).passes();
    let id = project.create_task(&["echo", "hello"]);
    project
        .hipercow()
        .args(&["task", "wait", &id, "--timeout", "1", "--poll", "1"])
        .exits_with(2)
        .stderr_has("Timed out waiting for task");
}

#[test]
fn cancel_created_task() {
    let project = Project::init();
    let id = project.create_task(&["echo", "hello"]);
    project
        .hipercow()
        .args(&["task", "cancel", &id])
        .passes()
        .stdout_eq(&format!("Cancelled task '{id}'\n"));
    project.hipercow().args(&["task", "status", &id]).passes().stdout_eq("cancelled\n");
}

#[test]
fn status_as_json() {
    let project = Project::init();
    let id = project.create_task(&["echo", "hello"]);
    let json = project.hipercow().args(&["-o", "json", "task", "status", &id]).passes().json();
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["status"], "created");
}

#[cfg(unix)]
mod eval {
    use crate::prelude::*;

    #[test]
    fn eval_with_capture_records_success_and_log() {
        let project = Project::init();
        let id = project.create_task(&["echo", "hello"]);
        project.hipercow().args(&["task", "eval", &id, "--capture"]).passes().stdout_eq("");
        project.hipercow().args(&["task", "status", &id]).passes().stdout_eq("success\n");
        project.hipercow().args(&["task", "log", &id]).passes().stdout_eq("hello\n");
        project
            .hipercow()
            .args(&["task", "list", "--with-status", "success"])
            .passes()
            .stdout_eq(&format!("{id}\n"));
        project.hipercow().args(&["task", "list", "--with-status", "failure"]).passes().stdout_eq("");
    }

    #[test]
    fn failing_command_is_recorded_not_raised() {
        let project = Project::init();
        let id = project.create_task(&["sh", "-c", "exit 3"]);
        project.hipercow().args(&["task", "eval", &id]).passes();
        project.hipercow().args(&["task", "status", &id]).passes().stdout_eq("failure\n");
        project
            .hipercow()
            .args(&["task", "wait", &id])
            .exits_with(1)
            .stderr_has("finished with status 'failure'");
        project.hipercow().args(&["task", "info", &id]).passes().stdout_has("exit status: 3");
    }

    #[test]
    fn finished_tasks_cannot_be_run_again() {
        let project = Project::init();
        let id = project.create_task(&["true"]);
        project.hipercow().args(&["task", "eval", &id]).passes();
        project.hipercow().args(&["task", "eval", &id]).fails().stderr_has("which has status 'success'");
    }

    #[test]
    fn task_env_vars_reach_the_command() {
        let project = Project::init();
        let id = project.create_task(&["--env", "GREETING=hi there", "sh", "-c", "echo $GREETING"]);
        project.hipercow().args(&["task", "eval", &id, "--capture"]).passes();
        project.hipercow().args(&["task", "log", &id]).passes().stdout_eq("hi there\n");
    }

    #[test]
    fn task_runs_in_the_directory_it_was_created_from() {
        let project = Project::init();
        project.file("sub/marker.txt", "found");
        let id = project
            .hipercow()
            .in_dir(&project.path().join("sub"))
            .args(&["task", "create", "cat", "marker.txt"])
            .passes()
            .stdout()
            .trim()
            .to_string();
        project.hipercow().args(&["task", "eval", &id, "--capture"]).passes();
        project.hipercow().args(&["task", "log", &id]).passes().stdout_eq("found\n");
    }

    #[test]
    fn bulk_tasks_share_a_bundle() {
        let project = Project::init();
        project
            .hipercow()
            .args(&["bulk", "create", "--name", "greetings", "--data", "who=alice,bob", "echo", "hi @{who}"])
            .passes()
            .stdout_has("Created bundle 'greetings' with 2 tasks");
        let json = project.hipercow().args(&["-o", "json", "bundle", "status", "greetings"]).passes().json();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        for row in rows {
            let id = row["id"].as_str().unwrap();
            project.hipercow().args(&["task", "eval", id, "--capture"]).passes();
        }
        project
            .hipercow()
            .args(&["bundle", "status", "greetings", "--reduce"])
            .passes()
            .stdout_eq("success\n");
        let first = rows[0]["id"].as_str().unwrap();
        project.hipercow().args(&["task", "log", first]).passes().stdout_eq("hi alice\n");
    }
}
