// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bundle command handlers

use anyhow::Result;
use clap::{Args, Subcommand};
use hc_core::TaskId;

use crate::color;
use crate::output::{print_json, print_names, OutputFormat};

#[derive(Args)]
pub struct BundleArgs {
    #[command(subcommand)]
    pub command: BundleCommand,
}

#[derive(Subcommand)]
pub enum BundleCommand {
    /// Group existing tasks into a bundle
    Create {
        /// Bundle name; random if omitted
        #[arg(long)]
        name: Option<String>,
        /// Replace a bundle with the same name
        #[arg(long)]
        overwrite: bool,
        /// Task ids
        #[arg(required = true)]
        ids: Vec<TaskId>,
    },
    /// List bundles
    List {},
    /// Show the status of a bundle's tasks
    Status {
        name: String,
        /// Print one status for the whole bundle
        #[arg(long)]
        reduce: bool,
    },
    /// Delete a bundle (its tasks are kept)
    Delete { name: String },
}

pub async fn handle(command: BundleCommand, format: OutputFormat) -> Result<()> {
    let hc = super::open()?;
    match command {
        BundleCommand::Create { name, overwrite, ids } => {
            let bundle = hc.bundle_create(ids, name.as_deref(), true, overwrite)?;
            println!("Created bundle '{}' with {} tasks", bundle.name, bundle.task_ids.len());
        }
        BundleCommand::List {} => print_names(&hc.bundle_list()?, "(none)", format)?,
        BundleCommand::Status { name, reduce: true } => {
            let status = hc.bundle_status_reduce(&name)?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({ "name": name, "status": status }))?,
                OutputFormat::Text => println!("{}", color::status(status)),
            }
        }
        BundleCommand::Status { name, reduce: false } => {
            let statuses = hc.bundle_status(&name)?;
            match format {
                OutputFormat::Json => {
                    let rows: Vec<_> = statuses
                        .iter()
                        .map(|(id, status)| serde_json::json!({ "id": id, "status": status }))
                        .collect();
                    print_json(&rows)?;
                }
                OutputFormat::Text => {
                    for (id, status) in &statuses {
                        println!("{id} {}", color::status(*status));
                    }
                }
            }
        }
        BundleCommand::Delete { name } => {
            if hc.bundle_delete(&name)? {
                println!("Deleted bundle '{name}'");
            } else {
                println!("No bundle '{name}' to delete");
            }
        }
    }
    Ok(())
}
