// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment command handlers

use anyhow::Result;
use clap::{Args, Subcommand};
use hc_core::{ProvisionId, ProvisioningRecord};
use hc_engine::{EnvironmentOutcome, DEFAULT_ENVIRONMENT};

use crate::color;
use crate::output::{format_elapsed_ms, format_timestamp, print_json, print_names, OutputFormat};

#[derive(Args)]
pub struct EnvironmentArgs {
    #[command(subcommand)]
    pub command: EnvironmentCommand,
}

#[derive(Subcommand)]
pub enum EnvironmentCommand {
    /// Create an environment
    New {
        #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
        name: String,
        /// Engine that builds the environment
        #[arg(long, default_value = "pip")]
        engine: String,
    },
    /// List environments
    List {},
    /// Delete an environment and everything installed in it
    Delete {
        #[arg(long)]
        name: String,
    },
    /// Install packages into an environment, via the configured driver
    Provision {
        #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
        name: String,
        /// Driver to provision with
        #[arg(long)]
        driver: Option<String>,
        /// Install command; detected from the project's files if omitted
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        cmd: Vec<String>,
    },
    /// Run a recorded provisioning request here
    #[command(hide = true)]
    ProvisionRun {
        name: String,
        id: ProvisionId,
    },
    /// Show past provisioning attempts
    History {
        #[arg(long, default_value = DEFAULT_ENVIRONMENT)]
        name: String,
    },
}

pub async fn handle(command: EnvironmentCommand, format: OutputFormat) -> Result<()> {
    let hc = super::open()?;
    match command {
        EnvironmentCommand::New { name, engine } => match hc.environment_new(&name, &engine)? {
            EnvironmentOutcome::Created => println!("Creating environment '{name}' using '{engine}'"),
            EnvironmentOutcome::AlreadyExists => println!("Environment '{name}' already exists"),
        },
        EnvironmentCommand::List {} => print_names(&hc.environment_list()?, "(none)", format)?,
        EnvironmentCommand::Delete { name } => {
            hc.environment_delete(&name)?;
            println!("Deleted environment '{name}'");
        }
        EnvironmentCommand::Provision { name, driver, cmd } => {
            let id = hc.provision(&name, &cmd, driver.as_deref()).await?;
            println!("Provisioned environment '{name}' ({id})");
        }
        EnvironmentCommand::ProvisionRun { name, id } => hc.provision_run(&name, &id).await?,
        EnvironmentCommand::History { name } => {
            let history = hc.provision_history(&name)?;
            match format {
                OutputFormat::Json => {
                    let records: Vec<_> = history
                        .iter()
                        .map(|r| serde_json::json!({ "data": r.data, "result": r.result }))
                        .collect();
                    print_json(&records)?;
                }
                OutputFormat::Text => {
                    if history.is_empty() {
                        println!("No provisioning attempts for '{name}'");
                    }
                    for record in &history {
                        println!("{}", describe_attempt(record));
                    }
                }
            }
        }
    }
    Ok(())
}

fn describe_attempt(record: &ProvisioningRecord) -> String {
    let when = format_timestamp(record.data.time_ms);
    let outcome = match &record.result {
        None => color::muted("pending"),
        Some(result) => {
            let took = format_elapsed_ms(result.end_ms.saturating_sub(result.start_ms));
            match &result.error {
                None => format!("success in {took}"),
                Some(error) => format!("failed after {took}: {error}"),
            }
        }
    };
    let cmd = if record.data.cmd.is_empty() { "(automatic)".to_string() } else { record.data.cmd.join(" ") };
    format!("{} {when} {cmd} - {outcome}", color::header(record.data.id.as_str()))
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
