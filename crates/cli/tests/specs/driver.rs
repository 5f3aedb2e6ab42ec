// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Driver configuration

use crate::prelude::*;

#[test]
fn no_drivers_configured() {
    let project = Project::init();
    project.hipercow().args(&["driver", "list"]).passes().stdout_eq("(none)\n");
}

#[test]
fn configure_list_show_unconfigure() {
    let project = Project::init();
    project
        .hipercow()
        .args(&["driver", "configure", "example"])
        .passes()
        .stdout_eq("Configured hipercow to use 'example'\n");
    project
        .hipercow()
        .args(&["driver", "configure", "example"])
        .passes()
        .stdout_eq("Updated configuration for 'example'\n");
    project.hipercow().args(&["driver", "list"]).passes().stdout_eq("example\n");
    project
        .hipercow()
        .args(&["driver", "show"])
        .passes()
        .stdout_has("Configuration for 'example'")
        .stdout_has("(no configuration)");

    project
        .hipercow()
        .args(&["driver", "unconfigure", "example"])
        .passes()
        .stdout_eq("Removed configuration for 'example'\n");
    project
        .hipercow()
        .args(&["driver", "unconfigure", "example"])
        .passes()
        .stdout_eq("Did not remove configuration for 'example' as it was not enabled\n");
}

#[test]
fn configuration_is_per_host() {
    let project = Project::init();
    project.hipercow().args(&["driver", "configure", "example"]).passes();
    assert!(project.path().join("hipercow/config").join(HOSTNAME).join("example").is_file());
}

#[test]
fn unknown_driver_is_rejected() {
    let project = Project::init();
    project
        .hipercow()
        .args(&["driver", "configure", "slurm"])
        .fails()
        .stderr_has("No such driver 'slurm'");
}

#[test]
fn show_without_drivers_fails() {
    let project = Project::init();
    project.hipercow().args(&["driver", "show"]).fails().stderr_has("No driver configured");
}

#[test]
fn show_as_json() {
    let project = Project::init();
    project.hipercow().args(&["driver", "configure", "example"]).passes();
    let json = project.hipercow().args(&["-o", "json", "driver", "show", "example"]).passes().json();
    assert_eq!(json["driver"], "example");
}
