// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::ErrorKind;
use crate::test_helpers::project;
use yare::parameterized;

#[test]
fn check_defaults_to_default() {
    let p = project();
    assert_eq!(p.hc.environment_check(None).unwrap(), "default");
}

#[parameterized(
    empty = { "empty" },
    default = { "default" },
)]
fn check_accepts_implicit_environments(name: &str) {
    let p = project();
    assert_eq!(p.hc.environment_check(Some(name)).unwrap(), name);
}

#[test]
fn check_rejects_unknown_environment() {
    let p = project();
    let err = p.hc.environment_check(Some("other")).unwrap_err();
    assert_eq!(err.to_string(), "No such environment 'other'");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn new_is_idempotent() {
    let p = project();
    assert_eq!(p.hc.environment_new("analysis", "pip").unwrap(), EnvironmentOutcome::Created);
    assert_eq!(p.hc.environment_new("analysis", "pip").unwrap(), EnvironmentOutcome::AlreadyExists);
    assert_eq!(p.hc.environment_check(Some("analysis")).unwrap(), "analysis");
}

#[test]
fn new_rejects_reserved_name_and_unknown_engine() {
    let p = project();
    let err = p.hc.environment_new("empty", "pip").unwrap_err();
    assert!(err.to_string().contains("reserved name 'empty'"), "{err}");
    let err = p.hc.environment_new("analysis", "conda").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(!p.root().environment_exists("analysis"));
}

#[test]
fn list_includes_empty() {
    let p = project();
    assert_eq!(p.hc.environment_list().unwrap(), vec!["empty"]);
    p.hc.environment_new("zeta", "pip").unwrap();
    p.hc.environment_new("alpha", "pip").unwrap();
    assert_eq!(p.hc.environment_list().unwrap(), vec!["alpha", "empty", "zeta"]);
}

#[test]
fn delete_removes_environment() {
    let p = project();
    p.hc.environment_new("analysis", "pip").unwrap();
    p.hc.environment_delete("analysis").unwrap();
    assert!(!p.hc.environment_exists("analysis"));

    let err = p.hc.environment_delete("analysis").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(p.hc.environment_delete("empty").is_err());
}

#[test]
fn default_uses_empty_engine_until_created() {
    let p = project();
    let engine = environment_engine(p.root(), "default", System::local()).unwrap();
    assert_eq!(engine.name(), "empty");

    p.hc.environment_new("default", "pip").unwrap();
    let engine = environment_engine(p.root(), "default", System::local()).unwrap();
    assert_eq!(engine.name(), "pip");
    assert!(engine.path().starts_with(p.root().path_environment_contents("default")));
}

#[test]
fn engine_for_missing_environment() {
    let p = project();
    let err = environment_engine(p.root(), "analysis", System::local()).err().unwrap();
    assert_eq!(err.to_string(), "Environment 'analysis' does not exist");
}
