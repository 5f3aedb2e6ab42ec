// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::ErrorKind;
use crate::test_helpers::{project, strings};

fn row(pairs: &[(&str, &str)]) -> BulkRow {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn commands_substitute_each_row() {
    let template = strings(&["echo", "@{a}", "x-@{b}"]);
    let data = vec![row(&[("a", "1"), ("b", "p")]), row(&[("a", "2"), ("b", "q")])];
    let commands = bulk_create_shell_commands(&template, &data).unwrap();
    assert_eq!(commands, vec![strings(&["echo", "1", "x-p"]), strings(&["echo", "2", "x-q"])]);
}

#[test]
fn commands_need_data() {
    let err = bulk_create_shell_commands(&strings(&["echo"]), &[]).unwrap_err();
    assert_eq!(err.to_string(), "No data provided");
}

#[test]
fn commands_need_consistent_rows() {
    let template = strings(&["echo", "@{a}"]);
    let data = vec![row(&[("a", "1")]), row(&[("b", "2")])];
    let err = bulk_create_shell_commands(&template, &data).unwrap_err();
    assert!(err.to_string().starts_with("Unexpected keys"), "{err}");
}

#[test]
fn commands_need_template_to_match_data() {
    let data = vec![row(&[("a", "1"), ("b", "2")])];
    let err = bulk_create_shell_commands(&strings(&["echo", "@{a}", "@{c}"]), &data).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected substitutions found in template (not found in data: c; not used in template: b)"
    );
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn combine_expands_grid() {
    let rows = bulk_data_combine(&[
        ("a".to_string(), strings(&["1", "2"])),
        ("b".to_string(), strings(&["x", "y"])),
    ]);
    assert_eq!(
        rows,
        vec![
            row(&[("a", "1"), ("b", "x")]),
            row(&[("a", "1"), ("b", "y")]),
            row(&[("a", "2"), ("b", "x")]),
            row(&[("a", "2"), ("b", "y")]),
        ]
    );
}

#[test]
fn csv_with_header_and_quotes() {
    let rows = bulk_data_csv("a,b\n1,\"hello, world\"\r\n\n2,\"say \"\"hi\"\"\"\n").unwrap();
    assert_eq!(
        rows,
        vec![row(&[("a", "1"), ("b", "hello, world")]), row(&[("a", "2"), ("b", "say \"hi\"")])]
    );
}

#[test]
fn csv_value_spanning_lines() {
    let rows = bulk_data_csv("a,b\n1,\"two\nlines\"\n2,x\n").unwrap();
    assert_eq!(rows, vec![row(&[("a", "1"), ("b", "two\nlines")]), row(&[("a", "2"), ("b", "x")])]);
}

#[test]
fn csv_rejects_ragged_rows() {
    let err = bulk_data_csv("a,b\n1\n").unwrap_err();
    assert_eq!(err.to_string(), "Row 1 has 1 fields but the header has 2");
    assert!(bulk_data_csv("").is_err());
}

#[test]
fn create_validates_tasks() {
    let p = project();
    let err = p.hc.bundle_create(vec![TaskId::new()], Some("b"), true, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(p.hc.bundle_list().unwrap().is_empty());
}

#[test]
fn create_picks_a_name() {
    let p = project();
    let bundle = p.hc.bundle_create(Vec::new(), None, true, false).unwrap();
    assert!(bundle.name.starts_with("bundle-"), "{}", bundle.name);
    assert_eq!(p.hc.bundle_list().unwrap(), vec![bundle.name.clone()]);
    assert!(p.hc.bundle_delete(&bundle.name).unwrap());
    assert!(!p.hc.bundle_delete(&bundle.name).unwrap());
}

#[tokio::test]
async fn bulk_create_bundles_tasks_and_reports_status() {
    let p = project();
    let template = strings(&["echo", "@{n}"]);
    let data = vec![row(&[("n", "1")]), row(&[("n", "2")])];
    let bundle = p
        .hc
        .bulk_create_shell(&template, &data, Some("numbers"), &TaskCreateOptions::default())
        .await
        .unwrap();
    assert_eq!(bundle.task_ids.len(), 2);
    assert_eq!(p.hc.bundle_load("numbers").unwrap(), bundle);

    let first = &bundle.task_ids[0];
    let cmd = match p.root().task_data(first).unwrap().method {
        hc_core::TaskMethod::Shell { cmd } => cmd,
    };
    assert_eq!(cmd, strings(&["echo", "1"]));

    let statuses = p.hc.bundle_status("numbers").unwrap();
    assert!(statuses.iter().all(|(_, s)| *s == TaskStatus::Created));
    assert_eq!(p.hc.bundle_status_reduce("numbers").unwrap(), TaskStatus::Created);

    p.root().task_set_status(first, TaskStatus::Cancelled).unwrap();
    assert_eq!(p.hc.bundle_status_reduce("numbers").unwrap(), TaskStatus::Created);
    p.root().task_set_status(&bundle.task_ids[1], TaskStatus::Success).unwrap();
    assert_eq!(p.hc.bundle_status_reduce("numbers").unwrap(), TaskStatus::Cancelled);
}

#[tokio::test]
async fn bulk_create_refuses_existing_bundle() {
    let p = project();
    p.hc.bundle_create(Vec::new(), Some("taken"), false, false).unwrap();
    let err = p
        .hc
        .bulk_create_shell(&strings(&["echo", "@{n}"]), &[row(&[("n", "1")])], Some("taken"), &TaskCreateOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(p.root().task_list(None).unwrap().is_empty());
}
