// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn hostname_override_wins() {
    std::env::set_var("HIPERCOW_HOSTNAME", "fixed-host");
    assert_eq!(hostname(), "fixed-host");
    std::env::remove_var("HIPERCOW_HOSTNAME");
}

#[test]
#[serial]
fn hostname_is_never_empty() {
    std::env::remove_var("HIPERCOW_HOSTNAME");
    assert!(!hostname().is_empty());
}

#[test]
#[serial]
fn machine_hostname_is_looked_up_once() {
    std::env::remove_var("HIPERCOW_HOSTNAME");
    let first = machine_hostname();
    assert!(std::ptr::eq(first, machine_hostname()));
    assert_eq!(hostname(), first);
}

#[test]
fn system_display() {
    assert_eq!(System::Windows.to_string(), "windows");
    assert_eq!(serde_json::to_string(&System::Linux).unwrap(), "\"linux\"");
}
