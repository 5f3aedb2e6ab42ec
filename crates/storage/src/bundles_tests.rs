// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn setup() -> (TempDir, Root) {
    let dir = TempDir::new().unwrap();
    let (root, _) = Root::init(dir.path()).unwrap();
    (dir, root)
}

#[test]
fn save_load_list_delete() {
    let (_dir, root) = setup();
    let bundle = Bundle { name: "sweep".into(), task_ids: vec![TaskId::new(), TaskId::new()] };
    root.bundle_save(&bundle, false).unwrap();

    assert_eq!(root.bundle_load("sweep").unwrap(), bundle);
    assert_eq!(root.bundle_list().unwrap(), vec!["sweep".to_string()]);
    assert!(root.bundle_delete("sweep").unwrap());
    assert!(!root.bundle_delete("sweep").unwrap());
    assert!(root.bundle_list().unwrap().is_empty());
}

#[test]
fn overwrite_is_opt_in() {
    let (_dir, root) = setup();
    let bundle = Bundle { name: "b".into(), task_ids: vec![TaskId::new()] };
    root.bundle_save(&bundle, false).unwrap();
    let err = root.bundle_save(&bundle, false).unwrap_err();
    assert!(matches!(err, StorageError::BundleExists(_)));
    root.bundle_save(&bundle, true).unwrap();
}

#[test]
fn missing_bundle_is_not_found() {
    let (_dir, root) = setup();
    assert!(root.bundle_load("nope").unwrap_err().is_not_found());
}

#[yare::parameterized(
    empty = { "" },
    slash = { "a/b" },
    hidden = { ".x" },
    space = { "a b" },
)]
fn bad_names_are_rejected(name: &str) {
    let (_dir, root) = setup();
    let bundle = Bundle { name: name.into(), task_ids: vec![] };
    assert!(matches!(
        root.bundle_save(&bundle, true).unwrap_err(),
        StorageError::InvalidName { .. }
    ));
}
