// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DIDE cluster command handlers

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use hc_adapters::web::DEFAULT_CLUSTER;
use hc_adapters::{
    check_username, clear_credentials, load_credentials, store_credentials, stored_credentials, CredentialStore,
    Credentials, FileCredentialStore, ReqwestTransport,
};
use std::io::{BufRead, Write};

#[derive(Args)]
pub struct DideArgs {
    #[command(subcommand)]
    pub command: DideCommand,
}

#[derive(Subcommand)]
pub enum DideCommand {
    /// Store, check or forget your DIDE username and password
    Authenticate {
        #[arg(value_enum, default_value_t = AuthAction::Set)]
        action: AuthAction,
        /// Username to store; prompted for if not given
        #[arg(long)]
        username: Option<String>,
        /// Head node to check access against
        #[arg(long, default_value = DEFAULT_CLUSTER)]
        cluster: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AuthAction {
    Set,
    Check,
    Clear,
}

const INTRO: &str = "\
# Please enter your DIDE credentials

These are used to log into the cluster portal and are shared by every
project on this machine. Your DIDE password may differ from your college
password; if in doubt, check which combination works at
https://mrcdata.dide.ic.ac.uk/hpc
";

pub async fn handle(command: DideCommand) -> Result<()> {
    let DideCommand::Authenticate { action, username, cluster } = command;
    let store = FileCredentialStore::from_env()?;
    match action {
        AuthAction::Set => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut stderr = std::io::stderr();
            eprintln!("{INTRO}");
            let username = match username {
                Some(username) => check_username(&username)?,
                None => {
                    let default = default_username(&store);
                    prompt_username(&mut input, &mut stderr, default.as_deref())?
                }
            };
            eprintln!("Using username '{username}'\n");
            let password = prompt_password(&mut input, &mut stderr)?;
            let credentials = Credentials::new(username, password);

            eprintln!("Trying to log in with these credentials now");
            hc_engine::check_credentials(ReqwestTransport::new()?, credentials.clone(), &cluster)
                .await
                .context("login failed")?;
            store_credentials(&store, &credentials)?;
            println!("Success! Saved credentials to {}", store.path().display());
        }
        AuthAction::Check => {
            println!("Fetching credentials");
            let credentials = load_credentials(&store)?;
            println!("Testing credentials");
            hc_engine::check_credentials(ReqwestTransport::new()?, credentials, &cluster)
                .await
                .context("login failed")?;
            println!("Success!");
        }
        AuthAction::Clear => {
            if clear_credentials(&store)? {
                println!("Removed stored credentials");
            } else {
                println!("No credentials were stored");
            }
        }
    }
    Ok(())
}

/// Previously stored username, else the login name
fn default_username(store: &dyn CredentialStore) -> Option<String> {
    if let Ok(Some(credentials)) = stored_credentials(store) {
        return Some(credentials.username);
    }
    std::env::var("USER").or_else(|_| std::env::var("USERNAME")).ok()
}

fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line).context("could not read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub(crate) fn prompt_username(
    input: &mut impl BufRead,
    out: &mut impl Write,
    default: Option<&str>,
) -> Result<String> {
    match default {
        Some(default) => write!(out, "DIDE username (default: {default}) > ")?,
        None => write!(out, "DIDE username > ")?,
    }
    out.flush()?;
    let value = read_line(input)?;
    let value = if value.trim().is_empty() { default.unwrap_or_default().to_string() } else { value };
    Ok(check_username(&value)?)
}

pub(crate) fn prompt_password(input: &mut impl BufRead, out: &mut impl Write) -> Result<String> {
    write!(out, "DIDE password > ")?;
    out.flush()?;
    let value = read_line(input)?;
    if value.is_empty() {
        anyhow::bail!("Invalid empty password");
    }
    Ok(value)
}

#[cfg(test)]
#[path = "dide_tests.rs"]
mod tests;
