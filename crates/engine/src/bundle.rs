// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bundles of tasks, and creating many similar tasks at once.
//!
//! A bulk command is a template such as `["echo", "@{a}", "@{b}"]` plus a
//! table of values; each row becomes one task and the tasks are grouped
//! into a bundle.

use crate::context::Hipercow;
use crate::error::{EngineError, Result};
use crate::task::TaskCreateOptions;
use crate::template::{bulk_names, interpolate_bulk};
use hc_adapters::{read_table, TableError};
use hc_core::{reduce_status, Bundle, Clock, TaskId, TaskStatus};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One row of bulk data: substitution name to value
pub type BulkRow = BTreeMap<String, String>;

impl<C: Clock> Hipercow<C> {
    /// Group existing tasks under `name`, or a random name.
    ///
    /// With `validate`, every task must exist.
    pub fn bundle_create(
        &self,
        task_ids: Vec<TaskId>,
        name: Option<&str>,
        validate: bool,
        overwrite: bool,
    ) -> Result<Bundle> {
        if validate {
            if let Some(missing) = task_ids.iter().find(|id| !self.root().task_exists(id)) {
                return Err(hc_storage::StorageError::TaskNotFound(missing.clone()).into());
            }
        }
        let name = name.map_or_else(random_bundle_name, str::to_string);
        let bundle = Bundle { name, task_ids };
        self.root().bundle_save(&bundle, overwrite)?;
        Ok(bundle)
    }

    pub fn bundle_load(&self, name: &str) -> Result<Bundle> {
        Ok(self.root().bundle_load(name)?)
    }

    pub fn bundle_list(&self) -> Result<Vec<String>> {
        Ok(self.root().bundle_list()?)
    }

    /// Returns `false` if there was no such bundle
    pub fn bundle_delete(&self, name: &str) -> Result<bool> {
        Ok(self.root().bundle_delete(name)?)
    }

    /// Status of each task in a bundle, in bundle order
    pub fn bundle_status(&self, name: &str) -> Result<Vec<(TaskId, TaskStatus)>> {
        let bundle = self.root().bundle_load(name)?;
        bundle
            .task_ids
            .into_iter()
            .map(|id| {
                let status = self.root().task_status(&id)?;
                Ok((id, status))
            })
            .collect()
    }

    /// One status summarising a whole bundle
    pub fn bundle_status_reduce(&self, name: &str) -> Result<TaskStatus> {
        let statuses: Vec<TaskStatus> = self.bundle_status(name)?.into_iter().map(|(_, s)| s).collect();
        Ok(reduce_status(&statuses))
    }

    /// Create one shell task per row of `data` and bundle them.
    pub async fn bulk_create_shell(
        &self,
        template: &[String],
        data: &[BulkRow],
        bundle_name: Option<&str>,
        options: &TaskCreateOptions,
    ) -> Result<Bundle> {
        let commands = bulk_create_shell_commands(template, data)?;
        if let Some(name) = bundle_name {
            if self.root().bundle_list()?.iter().any(|b| b == name) {
                return Err(hc_storage::StorageError::BundleExists(name.to_string()).into());
            }
        }
        let mut ids = Vec::with_capacity(commands.len());
        for cmd in commands {
            ids.push(self.task_create_shell(cmd, options).await?);
        }
        let bundle = self.bundle_create(ids, bundle_name, false, false)?;
        tracing::info!(bundle = %bundle.name, tasks = bundle.task_ids.len(), "created bulk tasks");
        Ok(bundle)
    }
}

fn random_bundle_name() -> String {
    format!("bundle-{}", hc_core::id::random_hex(4))
}

/// Expand `template` once per row of `data`.
///
/// Every row must have the same keys, and those keys must be exactly the
/// `@{name}` substitutions used in the template.
pub fn bulk_create_shell_commands(template: &[String], data: &[BulkRow]) -> Result<Vec<Vec<String>>> {
    let Some(first) = data.first() else {
        return Err(EngineError::Validation("No data provided".to_string()));
    };
    let keys: BTreeSet<&String> = first.keys().collect();
    if let Some(row) = data.iter().find(|row| row.keys().collect::<BTreeSet<_>>() != keys) {
        return Err(EngineError::Validation(format!(
            "Unexpected keys in data row {{{}}}; expected {{{}}}",
            join(row.keys()),
            join(keys.iter().copied())
        )));
    }

    let used: BTreeSet<String> = template.iter().flat_map(|arg| bulk_names(arg.as_str())).collect();
    let keys: BTreeSet<String> = keys.into_iter().cloned().collect();
    if used != keys {
        let extra: Vec<&String> = used.difference(&keys).collect();
        let unused: Vec<&String> = keys.difference(&used).collect();
        let mut problems = Vec::new();
        if !extra.is_empty() {
            problems.push(format!("not found in data: {}", join(extra)));
        }
        if !unused.is_empty() {
            problems.push(format!("not used in template: {}", join(unused)));
        }
        return Err(EngineError::Validation(format!(
            "Unexpected substitutions found in template ({})",
            problems.join("; ")
        )));
    }

    Ok(data
        .iter()
        .map(|row| {
            let vars: HashMap<String, String> = row.clone().into_iter().collect();
            template.iter().map(|arg| interpolate_bulk(arg, &vars)).collect()
        })
        .collect())
}

/// Every combination of the given values, the last name varying fastest
pub fn bulk_data_combine(values: &[(String, Vec<String>)]) -> Vec<BulkRow> {
    let mut rows = vec![BulkRow::new()];
    for (name, options) in values {
        rows = rows
            .into_iter()
            .flat_map(|row| {
                options.iter().map(move |value| {
                    let mut row = row.clone();
                    row.insert(name.clone(), value.clone());
                    row
                })
            })
            .collect();
    }
    rows
}

/// Parse comma-separated data with a header row. Fields may be
/// double-quoted, including across lines; blank lines are skipped.
pub fn bulk_data_csv(text: &str) -> Result<Vec<BulkRow>> {
    let table = read_table(text, false).map_err(|e| match e {
        TableError::Empty => EngineError::Validation("No data provided".to_string()),
        e => EngineError::Validation(format!("Invalid data: {e}")),
    })?;
    table
        .rows
        .into_iter()
        .enumerate()
        .map(|(i, values)| {
            if values.len() != table.headers.len() {
                return Err(EngineError::Validation(format!(
                    "Row {} has {} fields but the header has {}",
                    i + 1,
                    values.len(),
                    table.headers.len()
                )));
            }
            Ok(table.headers.iter().cloned().zip(values).collect())
        })
        .collect()
}

fn join<T: AsRef<str>>(items: impl IntoIterator<Item = T>) -> String {
    items.into_iter().map(|s| s.as_ref().to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
#[path = "bundle_tests.rs"]
mod tests;
