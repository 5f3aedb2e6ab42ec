// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A driver that runs nothing remotely: submission only logs, and
//! provisioning happens in-process.

use super::Driver;
use crate::error::Result;
use crate::provision::provision_run;
use async_trait::async_trait;
use hc_adapters::System;
use hc_core::{Clock, ClusterResources, ProvisionId, Queues, TaskId, TaskResources};
use hc_storage::Root;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleConfig {}

impl ExampleConfig {
    pub fn describe(&self) -> String {
        "(no configuration)".to_string()
    }
}

pub struct ExampleDriver<C: Clock> {
    config: ExampleConfig,
    platform: System,
    clock: C,
}

impl<C: Clock> ExampleDriver<C> {
    pub fn new(config: ExampleConfig, platform: System, clock: C) -> Self {
        Self { config, platform, clock }
    }
}

#[async_trait]
impl<C: Clock> Driver for ExampleDriver<C> {
    fn name(&self) -> &'static str {
        "example"
    }

    async fn submit(&self, id: &TaskId, _resources: &TaskResources, _root: &Root) -> Result<()> {
        tracing::info!(task_id = %id, "example driver accepted task");
        Ok(())
    }

    async fn provision(&self, name: &str, id: &ProvisionId, root: &Root) -> Result<()> {
        provision_run(root, name, id, self.platform, &self.clock).await
    }

    fn resources(&self) -> ClusterResources {
        ClusterResources { queues: Queues::simple("default"), max_cores: 1, max_memory: 32 }
    }

    fn show_configuration(&self) -> String {
        self.config.describe()
    }
}
