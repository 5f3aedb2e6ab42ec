// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hipercow: run tasks on the DIDE cluster from a shared project directory

mod color;
mod commands;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::commands::{bulk, bundle, dide, driver, environment, task};
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "hipercow", version, styles = color::styles())]
#[command(about = "Run tasks on the DIDE cluster from a shared project directory")]
struct Cli {
    /// Output format for listings and status
    #[arg(short = 'o', long, value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a hipercow root in a directory
    Init {
        /// Directory to initialise
        path: PathBuf,
    },
    /// Configure drivers
    Driver(driver::DriverArgs),
    /// Create, run and inspect tasks
    Task(task::TaskArgs),
    /// DIDE cluster utilities
    Dide(dide::DideArgs),
    /// Manage environments
    Environment(environment::EnvironmentArgs),
    /// Inspect groups of tasks
    Bundle(bundle::BundleArgs),
    /// Create many tasks from one template
    Bulk(bulk::BulkArgs),
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(hc_adapters::env::log_filter()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output;
    match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Driver(args) => driver::handle(args.command, format).await,
        Commands::Task(args) => task::handle(args.command, format).await,
        Commands::Dide(args) => dide::handle(args.command).await,
        Commands::Environment(args) => environment::handle(args.command, format).await,
        Commands::Bundle(args) => bundle::handle(args.command, format).await,
        Commands::Bulk(args) => bulk::handle(args.command, format).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("{}", exit.message);
                }
                ExitCode::from(exit.code)
            }
            None => {
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}
