// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format an epoch-milliseconds timestamp as UTC, e.g. `2026-10-18 09:30:00`
pub fn format_timestamp(epoch_ms: u64) -> String {
    i64::try_from(epoch_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Format a span of milliseconds compactly ("850ms", "12s", "3m 5s", "2h 0m")
pub fn format_elapsed_ms(ms: u64) -> String {
    if ms < 1000 {
        return format!("{ms}ms");
    }
    let secs = ms / 1000;
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3599 => format!("{}m {}s", secs / 60, secs % 60),
        _ => format!("{}h {}m", secs / 3600, (secs % 3600) / 60),
    }
}

/// Print names one per line, or `placeholder` when there are none
pub fn print_names(names: &[String], placeholder: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(names),
        OutputFormat::Text => {
            if names.is_empty() {
                println!("{placeholder}");
            }
            for name in names {
                println!("{name}");
            }
            Ok(())
        }
    }
}
