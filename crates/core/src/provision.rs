// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment provisioning records

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of one provisioning attempt: 16 lowercase hex characters.
    pub struct ProvisionId(8, "provisioning id");
}

/// A provisioning request, written before the driver is asked to run it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningData {
    pub name: String,
    pub id: ProvisionId,
    pub cmd: Vec<String>,
    /// Submission time, epoch milliseconds
    pub time_ms: u64,
}

/// Outcome of a provisioning attempt. Written exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningResult {
    /// Error message if provisioning failed
    #[serde(default)]
    pub error: Option<String>,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl ProvisioningResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A request together with its result, if one has been written yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRecord {
    pub data: ProvisioningData,
    pub result: Option<ProvisioningResult>,
}
