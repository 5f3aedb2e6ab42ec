// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The DIDE cluster driver: batch scripts on a network share, submitted
//! through the cluster web portal.

use super::Driver;
use crate::batch::{
    write_batch_provision, write_batch_provision_linux, write_batch_task_run,
    write_batch_task_run_linux, ScriptMeta, DEFAULT_LINUX_TOOL, DEFAULT_WINDOWS_TOOL,
};
use crate::error::{EngineError, Result};
use async_trait::async_trait;
use hc_adapters::web::DEFAULT_CLUSTER;
use hc_adapters::{
    detect_mounts, remap_path, Credentials, DideWebClient, HttpTransport, Mount, PathMap, System,
};
use hc_core::{ClusterResources, ProvisionId, Queues, TaskId, TaskResources, TaskStatus};
use hc_storage::Root;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::sync::Mutex;

const DRIVER_NAME: &str = "dide";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DideConfig {
    pub path_map: PathMap,
    /// Operating system of the nodes tasks run on
    pub platform: System,
    pub cluster: String,
    /// `hipercow` executable as seen from a node
    pub tool: String,
}

/// Overrides for [`DideConfig::detect`]
#[derive(Debug, Clone, Default)]
pub struct DideOptions {
    pub platform: Option<System>,
    pub cluster: Option<String>,
    pub tool: Option<String>,
    /// Use these mounts instead of asking the operating system
    pub mounts: Option<Vec<Mount>>,
}

impl DideConfig {
    /// Work out how `root` is reached from the cluster
    pub fn detect(root: &Root, options: DideOptions) -> Result<Self> {
        let mounts = match options.mounts {
            Some(mounts) => mounts,
            None => detect_mounts()?,
        };
        let path_map = remap_path(root.path(), &mounts)?;
        let platform = options.platform.unwrap_or(System::Windows);
        if platform == System::Linux {
            path_map.linux_path()?;
        }
        let default_tool =
            if platform == System::Linux { DEFAULT_LINUX_TOOL } else { DEFAULT_WINDOWS_TOOL };
        let tool = options.tool.unwrap_or_else(|| default_tool.to_string());
        Ok(Self {
            path_map,
            platform,
            cluster: options.cluster.unwrap_or_else(|| DEFAULT_CLUSTER.to_string()),
            tool,
        })
    }
}

impl DideConfig {
    /// Human-readable summary, one setting per line
    pub fn describe(&self) -> String {
        let map = &self.path_map;
        [
            format!("cluster: {}", self.cluster),
            format!("platform: {}", self.platform),
            format!("share: {} (mounted at {})", map.unc_share(), map.mount.local.display()),
            format!("drive: {}", map.drive),
            format!("relative path: {}", map.relative),
            format!("tool: {}", self.tool),
        ]
        .join("\n")
    }
}

/// Log in with `credentials` and confirm they can reach `cluster`
pub async fn check_credentials<T: HttpTransport>(
    transport: T,
    credentials: Credentials,
    cluster: &str,
) -> Result<()> {
    let mut client = DideWebClient::new(transport, credentials).with_cluster(cluster);
    client.check_access().await?;
    tracing::info!(user = %client.username(), cluster, "credentials accepted");
    Ok(())
}

/// Queues on the Windows and Linux node pools
pub fn dide_resources(platform: System) -> ClusterResources {
    let queues = if platform == System::Linux {
        Queues::simple("LinuxNodes")
    } else {
        Queues {
            valid: BTreeSet::from(["AllNodes", "BuildQueue", "Testing"].map(String::from)),
            default: "AllNodes".to_string(),
            build: "BuildQueue".to_string(),
            test: "Testing".to_string(),
        }
    };
    ClusterResources { queues, max_cores: 32, max_memory: 512 }
}

pub struct DideDriver<T: HttpTransport> {
    config: DideConfig,
    client: Mutex<DideWebClient<T>>,
    poll: Duration,
}

impl<T: HttpTransport> DideDriver<T> {
    pub fn new(config: DideConfig, client: DideWebClient<T>, poll: Duration) -> Self {
        Self { config, client: Mutex::new(client), poll }
    }

    fn write_task_script(&self, id: &TaskId, root: &Root) -> Result<String> {
        let meta = ScriptMeta::current();
        let map = &self.config.path_map;
        match self.config.platform {
            System::Linux => write_batch_task_run_linux(root, id, map, &self.config.tool, &meta),
            _ => write_batch_task_run(root, id, map, &self.config.tool, &meta),
        }
    }

    fn write_provision_script(&self, name: &str, id: &ProvisionId, root: &Root) -> Result<String> {
        let meta = ScriptMeta::current();
        let map = &self.config.path_map;
        match self.config.platform {
            System::Linux => write_batch_provision_linux(root, name, id, map, &self.config.tool, &meta),
            _ => write_batch_provision(root, name, id, map, &self.config.tool, &meta),
        }
    }

    /// Poll the scheduler until `dide_id` reaches a terminal status
    async fn wait_remote(&self, dide_id: &str) -> Result<TaskStatus> {
        let mut last = None;
        loop {
            let status = self.client.lock().await.status_job(dide_id).await?;
            if last != Some(status) {
                tracing::info!(dide_id, %status, "remote job status");
                last = Some(status);
            }
            if status.is_terminal() {
                return Ok(status);
            }
            tokio::time::sleep(self.poll).await;
        }
    }
}

#[async_trait]
impl<T: HttpTransport + 'static> Driver for DideDriver<T> {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    async fn submit(&self, id: &TaskId, resources: &TaskResources, root: &Root) -> Result<()> {
        let path = self.write_task_script(id, root)?;
        let dide_id = self.client.lock().await.submit(&path, id.as_str(), resources).await?;
        root.task_set_remote_id(id, DRIVER_NAME, &dide_id)?;
        Ok(())
    }

    async fn provision(&self, name: &str, id: &ProvisionId, root: &Root) -> Result<()> {
        let path = self.write_provision_script(name, id, root)?;
        let resources = TaskResources::default().queue(self.resources().queues.build);
        let job_name = format!("{name}-{id}");
        let dide_id = self.client.lock().await.submit(&path, &job_name, &resources).await?;
        tracing::info!(environment = name, provision_id = %id, dide_id, "submitted provisioning job");

        let status = self.wait_remote(&dide_id).await?;
        if status == TaskStatus::Success {
            return Ok(());
        }
        let remote_log = match self.client.lock().await.log(&dide_id).await {
            Ok(log) => log,
            Err(e) => format!("(remote log unavailable: {e})"),
        };
        let local_log = root.path_provision_log(name, id);
        tracing::error!(environment = name, provision_id = %id, dide_id, %status, "provisioning job failed");
        Err(EngineError::ProvisionFailed {
            message: format!(
                "job {dide_id} finished with status '{status}'\nlocal log: {}\nremote log:\n{remote_log}",
                local_log.display()
            ),
        })
    }

    fn resources(&self) -> ClusterResources {
        dide_resources(self.config.platform)
    }

    fn show_configuration(&self) -> String {
        self.config.describe()
    }

    async fn cancel(&self, ids: &[TaskId], root: &Root) -> Result<Vec<(TaskId, bool)>> {
        let mut remote = Vec::with_capacity(ids.len());
        for id in ids {
            let dide_id = root
                .task_remote_id(id, DRIVER_NAME)?
                .ok_or_else(|| EngineError::NoRemoteId(id.clone()))?;
            remote.push((id.clone(), dide_id));
        }
        let dide_ids: Vec<String> = remote.iter().map(|(_, d)| d.clone()).collect();
        let response = self.client.lock().await.cancel(&dide_ids).await?;
        Ok(remote
            .into_iter()
            .map(|(id, dide_id)| {
                let ok = response.get(&dide_id).is_some_and(|msg| msg == "OK");
                (id, ok)
            })
            .collect())
    }

    async fn task_log(&self, id: &TaskId, root: &Root) -> Result<Option<String>> {
        let Some(dide_id) = root.task_remote_id(id, DRIVER_NAME)? else {
            return Ok(None);
        };
        Ok(Some(self.client.lock().await.log(&dide_id).await?))
    }
}

#[cfg(test)]
#[path = "dide_tests.rs"]
mod tests;
