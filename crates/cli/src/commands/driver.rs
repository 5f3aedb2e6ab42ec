// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Driver command handlers

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use hc_adapters::System;
use hc_engine::{ConfigureOutcome, DideConfig, DideOptions, DriverConfig, EngineError, ExampleConfig};

use crate::color;
use crate::output::{print_json, print_names, OutputFormat};

#[derive(Args)]
pub struct DriverArgs {
    #[command(subcommand)]
    pub command: DriverCommand,
}

#[derive(Subcommand)]
pub enum DriverCommand {
    /// Configure a driver for this machine
    Configure {
        /// Driver name (example, dide)
        name: String,
        /// Operating system of the cluster nodes (dide only)
        #[arg(long, value_enum)]
        platform: Option<Platform>,
        /// Head node to submit to (dide only)
        #[arg(long)]
        cluster: Option<String>,
        /// Path of the hipercow executable on the nodes (dide only)
        #[arg(long)]
        tool: Option<String>,
    },
    /// Remove a driver's configuration
    Unconfigure {
        /// Driver name
        name: String,
    },
    /// Show a driver's configuration
    Show {
        /// Driver name; defaults to the only configured driver
        name: Option<String>,
    },
    /// List configured drivers
    List {},
}

/// Node operating systems the DIDE cluster offers
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Windows,
    Linux,
}

impl From<Platform> for System {
    fn from(platform: Platform) -> System {
        match platform {
            Platform::Windows => System::Windows,
            Platform::Linux => System::Linux,
        }
    }
}

pub async fn handle(command: DriverCommand, format: OutputFormat) -> Result<()> {
    let hc = super::open()?;
    match command {
        DriverCommand::Configure { name, platform, cluster, tool } => {
            let config = match name.as_str() {
                "example" => DriverConfig::Example(ExampleConfig::default()),
                "dide" => {
                    let options =
                        DideOptions { platform: platform.map(System::from), cluster, tool, mounts: None };
                    DriverConfig::Dide(DideConfig::detect(hc.root(), options)?)
                }
                _ => return Err(EngineError::NoSuchDriver(name).into()),
            };
            match hc.driver_configure(config)? {
                ConfigureOutcome::Configured => println!("Configured hipercow to use '{}'", name),
                ConfigureOutcome::Updated => println!("Updated configuration for '{}'", name),
            }
        }
        DriverCommand::Unconfigure { name } => {
            if hc.driver_unconfigure(&name)? {
                println!("Removed configuration for '{}'", name);
            } else {
                println!("Did not remove configuration for '{}' as it was not enabled", name);
            }
        }
        DriverCommand::Show { name } => {
            let Some(config) = hc.driver_select(name.as_deref(), false)? else {
                return Err(EngineError::NoDriver.into());
            };
            match format {
                OutputFormat::Json => print_json(&config)?,
                OutputFormat::Text => {
                    println!("Configuration for '{}'", color::header(config.name()));
                    println!("{}", config.describe());
                }
            }
        }
        DriverCommand::List {} => print_names(&hc.driver_list()?, "(none)", format)?,
    }
    Ok(())
}
