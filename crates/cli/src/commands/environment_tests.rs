// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::describe_attempt;
use hc_core::{ProvisionId, ProvisioningData, ProvisioningRecord, ProvisioningResult};
use serial_test::serial;

fn record(result: Option<ProvisioningResult>) -> ProvisioningRecord {
    ProvisioningRecord {
        data: ProvisioningData {
            name: "default".to_string(),
            id: ProvisionId::parse("0123456789abcdef").unwrap(),
            cmd: vec!["pip".to_string(), "install".to_string(), ".".to_string()],
            time_ms: 0,
        },
        result,
    }
}

#[test]
#[serial]
fn pending_attempt() {
    std::env::set_var("NO_COLOR", "1");
    assert_eq!(describe_attempt(&record(None)), "0123456789abcdef 1970-01-01 00:00:00 pip install . - pending");
}

#[test]
#[serial]
fn finished_attempts_show_duration_and_error() {
    std::env::set_var("NO_COLOR", "1");
    let ok = ProvisioningResult { error: None, start_ms: 1_000, end_ms: 31_000 };
    assert!(describe_attempt(&record(Some(ok))).ends_with("- success in 30s"));

    let failed = ProvisioningResult { error: Some("pip exited 1".to_string()), start_ms: 0, end_ms: 500 };
    assert!(describe_attempt(&record(Some(failed))).ends_with("- failed after 500ms: pip exited 1"));
}
