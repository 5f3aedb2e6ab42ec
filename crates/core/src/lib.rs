// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hc-core: Core types for the hipercow task runner

pub mod macros;

pub mod bundle;
pub mod clock;
pub mod id;
pub mod provision;
pub mod resources;
pub mod status;
pub mod task;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bundle::{reduce_status, Bundle};
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{short, IdError};
pub use provision::{ProvisionId, ProvisioningData, ProvisioningRecord, ProvisioningResult};
pub use resources::{ClusterResources, Queues, ResourceError, TaskResources};
pub use status::{StatusMask, StatusParseError, TaskStatus};
pub use task::{TaskData, TaskId, TaskMethod, TaskResult, TaskTimes};
