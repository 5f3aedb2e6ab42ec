// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task command handlers

use anyhow::Result;
use clap::{Args, Subcommand};
use hc_core::{StatusMask, TaskData, TaskId, TaskMethod, TaskResources, TaskResult, TaskStatus, TaskTimes};
use hc_engine::{Hipercow, TaskCreateOptions, WaitOptions, WaitOutcome, DEFAULT_WAIT_INTERVAL};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::args::{parse_duration, parse_key_value};
use crate::color;
use crate::exit_error::{codes, ExitError};
use crate::output::{format_elapsed_ms, format_timestamp, print_json, OutputFormat};

#[derive(Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Print a task's status
    Status {
        /// Task id
        id: TaskId,
    },
    /// Show a task's definition, timings and result
    Info {
        /// Task id
        id: TaskId,
    },
    /// Print a task's captured output
    Log {
        /// Task id
        id: TaskId,
        /// Print the path of the log file instead
        #[arg(long)]
        filename: bool,
        /// Show the cluster's log for the task rather than the task's own
        #[arg(long, conflicts_with = "filename")]
        outer: bool,
    },
    /// List task ids
    List {
        /// Only tasks with this status (repeatable; also terminal, runnable, all)
        #[arg(long = "with-status")]
        with_status: Vec<StatusMask>,
    },
    /// Print the most recently created task id
    Last {},
    /// List recently created task ids, oldest first
    Recent {
        /// Only the last N
        #[arg(long)]
        limit: Option<usize>,
        /// Rebuild the recent list from the task store first
        #[arg(long)]
        rebuild: bool,
    },
    /// Create a task that runs a command
    Create {
        /// Command and its arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        cmd: Vec<String>,
        /// Environment to run in
        #[arg(long)]
        environment: Option<String>,
        /// Environment variable for the task (can be repeated: --env KEY=VALUE)
        #[arg(long = "env", value_parser = parse_key_value)]
        envvars: Vec<(String, String)>,
        /// Driver to submit with
        #[arg(long)]
        driver: Option<String>,
        #[command(flatten)]
        resources: ResourceFlags,
        /// Wait for the task to finish
        #[arg(long)]
        wait: bool,
    },
    /// Run a task in this process
    Eval {
        /// Task id
        id: TaskId,
        /// Write output to the task log instead of the terminal
        #[arg(long)]
        capture: bool,
    },
    /// Wait for a task to finish
    Wait {
        /// Task id
        id: TaskId,
        #[command(flatten)]
        wait: WaitFlags,
    },
    /// Cancel tasks
    Cancel {
        /// Task ids
        #[arg(required = true)]
        ids: Vec<TaskId>,
    },
}

/// Resource requests; nothing set means the cluster defaults
#[derive(Args, Debug, Default)]
pub struct ResourceFlags {
    /// Queue name, or .default / .test / .build
    #[arg(long)]
    pub queue: Option<String>,
    /// Number of cores
    #[arg(long)]
    pub cores: Option<u32>,
    /// Have the node to yourself
    #[arg(long)]
    pub exclusive: bool,
    /// Maximum runtime (e.g. "30m", "2h")
    #[arg(long, value_parser = parse_duration)]
    pub max_runtime: Option<Duration>,
    /// Gigabytes of memory the node must have
    #[arg(long)]
    pub memory_per_node: Option<u32>,
    /// Gigabytes of memory the task needs
    #[arg(long)]
    pub memory_per_task: Option<u32>,
}

impl ResourceFlags {
    pub fn into_resources(self) -> Option<TaskResources> {
        let ResourceFlags { queue, cores, exclusive, max_runtime, memory_per_node, memory_per_task } = self;
        if queue.is_none()
            && cores.is_none()
            && !exclusive
            && max_runtime.is_none()
            && memory_per_node.is_none()
            && memory_per_task.is_none()
        {
            return None;
        }
        let mut resources = TaskResources::default().exclusive(exclusive);
        if let Some(cores) = cores {
            resources = resources.cores(cores);
        }
        resources.queue = queue;
        resources.max_runtime = max_runtime.map(|d| u32::try_from(d.as_secs()).unwrap_or(u32::MAX));
        resources.memory_per_node = memory_per_node;
        resources.memory_per_task = memory_per_task;
        Some(resources)
    }
}

#[derive(Args, Debug)]
pub struct WaitFlags {
    /// Interval between status checks
    #[arg(long, value_parser = parse_duration)]
    pub poll: Option<Duration>,
    /// Give up after this long (exit code 2)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
    /// Do not copy the task's log to the terminal while waiting
    #[arg(long)]
    pub no_show_log: bool,
    /// Wait even if the task has not been submitted
    #[arg(long)]
    pub allow_created: bool,
}

impl WaitFlags {
    fn options(&self) -> WaitOptions {
        WaitOptions {
            interval: self.poll.unwrap_or(DEFAULT_WAIT_INTERVAL),
            timeout: self.timeout,
            allow_created: self.allow_created,
        }
    }
}

#[derive(Serialize)]
struct TaskInfo {
    id: TaskId,
    status: TaskStatus,
    data: TaskData,
    times: TaskTimes,
    result: Option<TaskResult>,
}

pub async fn handle(command: TaskCommand, format: OutputFormat) -> Result<()> {
    let hc = super::open()?;
    let root = hc.root();
    match command {
        TaskCommand::Status { id } => {
            let status = root.task_status(&id)?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({ "id": id, "status": status }))?,
                OutputFormat::Text => println!("{}", color::status(status)),
            }
        }
        TaskCommand::Info { id } => {
            let info = TaskInfo {
                status: root.task_status(&id)?,
                data: root.task_data(&id)?,
                times: root.task_times(&id)?,
                result: root.task_result(&id)?,
                id,
            };
            match format {
                OutputFormat::Json => print_json(&info)?,
                OutputFormat::Text => print_info(&info),
            }
        }
        TaskCommand::Log { id, filename, outer } => {
            if filename {
                if !root.task_exists(&id) {
                    return Err(hc_storage::StorageError::TaskNotFound(id).into());
                }
                println!("{}", root.path_task_log(&id).display());
            } else if let Some(log) = hc.task_log(&id, outer).await? {
                print!("{log}");
                if !log.ends_with('\n') {
                    println!();
                }
            }
        }
        TaskCommand::List { with_status } => {
            let mask = with_status.into_iter().reduce(|a, b| a | b);
            print_ids(&root.task_list(mask)?, format)?;
        }
        TaskCommand::Last {} => {
            if let Some(id) = root.last()? {
                print_ids(&[id], format)?;
            }
        }
        TaskCommand::Recent { limit, rebuild } => {
            if rebuild {
                root.recent_rebuild()?;
            }
            print_ids(&root.recent(limit)?, format)?;
        }
        TaskCommand::Create { cmd, environment, envvars, driver, resources, wait } => {
            let mut options = TaskCreateOptions::default()
                .envvars(envvars.into_iter().collect())
                .cwd(std::env::current_dir()?);
            options.environment = environment;
            options.driver = driver;
            options.resources = resources.into_resources();
            let id = hc.task_create_shell(cmd, &options).await?;
            println!("{id}");
            if wait {
                let flags = WaitFlags { poll: None, timeout: None, no_show_log: false, allow_created: false };
                wait_for(&hc, &id, &flags).await?;
            }
        }
        TaskCommand::Eval { id, capture } => {
            let status = hc.task_eval(&id, capture).await?;
            tracing::info!(task_id = %id, %status, "task evaluated");
        }
        TaskCommand::Wait { id, wait } => wait_for(&hc, &id, &wait).await?,
        TaskCommand::Cancel { ids } => {
            for (id, cancelled) in hc.task_cancel(&ids).await? {
                if cancelled {
                    println!("Cancelled task '{id}'");
                } else {
                    println!("Did not cancel task '{id}'");
                }
            }
        }
    }
    Ok(())
}

/// Wait for `id`, turning anything but success into an exit code
pub(crate) async fn wait_for(hc: &Hipercow, id: &TaskId, flags: &WaitFlags) -> Result<()> {
    let mut stdout = std::io::stdout();
    let follow: Option<&mut dyn Write> = if flags.no_show_log { None } else { Some(&mut stdout) };
    match hc.task_wait(id, &flags.options(), follow).await? {
        WaitOutcome::Finished(TaskStatus::Success) => Ok(()),
        WaitOutcome::Finished(status) => {
            Err(ExitError::new(codes::FAILURE, format!("Task '{id}' finished with status '{status}'")).into())
        }
        WaitOutcome::TimedOut(status) => Err(ExitError::new(
            codes::TIMEOUT,
            format!("Timed out waiting for task '{id}', which has status '{status}'"),
        )
        .into()),
    }
}

fn print_ids(ids: &[TaskId], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(ids)?,
        OutputFormat::Text => {
            for id in ids {
                println!("{id}");
            }
        }
    }
    Ok(())
}

fn print_info(info: &TaskInfo) {
    let TaskMethod::Shell { cmd } = &info.data.method;
    println!("{} {}", color::header("task"), info.id);
    println!("  status:      {}", color::status(info.status));
    println!("  command:     {}", cmd.join(" "));
    println!("  environment: {}", info.data.environment);
    println!("  directory:   {}", info.data.path);
    for (key, value) in &info.data.envvars {
        println!("  env:         {key}={value}");
    }
    if let Some(resources) = &info.data.resources {
        let queue = resources.queue.as_deref().unwrap_or("(default)");
        println!("  resources:   {} core(s) on {}", resources.cores, queue);
    }
    println!("  created:     {}", format_timestamp(info.times.created_ms));
    if let Some(started) = info.times.started_ms {
        println!("  started:     {}", format_timestamp(started));
        let waited = started.saturating_sub(info.times.created_ms);
        println!("  {}", color::context(&format!("queued for {}", format_elapsed_ms(waited))));
    }
    if let Some(finished) = info.times.finished_ms {
        println!("  finished:    {}", format_timestamp(finished));
        if let Some(started) = info.times.started_ms {
            let ran = finished.saturating_sub(started);
            println!("  {}", color::context(&format!("ran for {}", format_elapsed_ms(ran))));
        }
    }
    if let Some(result) = &info.result {
        let output = result.output.as_deref().unwrap_or("");
        println!("  result:      {}", color::muted(output));
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
