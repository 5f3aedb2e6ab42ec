// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bulk task creation

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use hc_engine::{bulk_data_combine, bulk_data_csv, BulkRow, TaskCreateOptions};
use std::path::{Path, PathBuf};

use super::args::{parse_key_value, parse_values};
use super::task::ResourceFlags;
use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct BulkArgs {
    #[command(subcommand)]
    pub command: BulkCommand,
}

#[derive(Subcommand)]
pub enum BulkCommand {
    /// Create one task per combination of values, substituted into @{name}
    Create {
        /// Template command, e.g. `python fit.py --alpha @{alpha}`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        template: Vec<String>,
        /// Values for a substitution (repeatable: --data alpha=0.1,0.2)
        #[arg(long, value_parser = parse_values, required_unless_present = "csv")]
        data: Vec<(String, Vec<String>)>,
        /// Read rows of values from a CSV file with a header line
        #[arg(long, conflicts_with = "data")]
        csv: Option<PathBuf>,
        /// Bundle name; random if omitted
        #[arg(long)]
        name: Option<String>,
        /// Environment to run in
        #[arg(long)]
        environment: Option<String>,
        /// Environment variable for every task (repeatable: --env KEY=VALUE)
        #[arg(long = "env", value_parser = parse_key_value)]
        envvars: Vec<(String, String)>,
        /// Driver to submit with
        #[arg(long)]
        driver: Option<String>,
        #[command(flatten)]
        resources: ResourceFlags,
    },
}

/// Rows of substitution values, from a CSV file or a grid of `--data` values
pub(crate) fn load_rows(data: &[(String, Vec<String>)], csv: Option<&Path>) -> Result<Vec<BulkRow>> {
    match csv {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
            Ok(bulk_data_csv(&text)?)
        }
        None => Ok(bulk_data_combine(data)),
    }
}

pub async fn handle(command: BulkCommand, format: OutputFormat) -> Result<()> {
    let BulkCommand::Create { template, data, csv, name, environment, envvars, driver, resources } = command;
    let hc = super::open()?;
    let rows = load_rows(&data, csv.as_deref())?;

    let mut options = TaskCreateOptions::default()
        .envvars(envvars.into_iter().collect())
        .cwd(std::env::current_dir()?);
    options.environment = environment;
    options.driver = driver;
    options.resources = resources.into_resources();

    let bundle = hc.bulk_create_shell(&template, &rows, name.as_deref(), &options).await?;
    match format {
        OutputFormat::Json => {
            print_json(&serde_json::json!({ "name": bundle.name, "task_ids": bundle.task_ids }))?
        }
        OutputFormat::Text => {
            println!("Created bundle '{}' with {} tasks", bundle.name, bundle.task_ids.len());
            for id in &bundle.task_ids {
                println!("{id}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "bulk_tests.rs"]
mod tests;
