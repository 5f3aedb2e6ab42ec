// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod args;
pub mod bulk;
pub mod bundle;
pub mod dide;
pub mod driver;
pub mod environment;
pub mod task;

use anyhow::{Context, Result};
use hc_engine::Hipercow;
use hc_storage::{InitOutcome, Root};
use std::path::Path;

/// Open the root containing the working directory
pub fn open() -> Result<Hipercow> {
    let cwd = std::env::current_dir().context("could not read working directory")?;
    Ok(Hipercow::new(Root::open(&cwd)?))
}

pub fn init(path: &Path) -> Result<()> {
    if let Ok(existing) = Root::open(path) {
        if existing.path() != path.canonicalize()?.as_path() {
            println!(
                "hipercow already initialised at {} (found from {})",
                existing.path().display(),
                path.display()
            );
        }
    }
    match Root::init(path)?.1 {
        InitOutcome::Created => println!("Initialised hipercow at {}", path.display()),
        InitOutcome::Existing => println!("hipercow already initialised at {}", path.display()),
    }
    Ok(())
}
