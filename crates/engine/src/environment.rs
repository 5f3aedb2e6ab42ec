// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named environments a task runs inside.
//!
//! Two names are always usable without being created: `empty`, which has
//! nothing installed, and `default`, which behaves as `empty` until someone
//! creates it.

use crate::context::Hipercow;
use crate::error::{EngineError, Result};
use hc_adapters::{engine_for, EmptyEngine, EngineContext, EnvironmentEngine, System};
use hc_core::Clock;
use hc_storage::{EnvironmentConfig, Root};

pub const EMPTY_ENVIRONMENT: &str = "empty";
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// Engines that can back a created environment
pub const CREATABLE_ENGINES: &[&str] = &["pip"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentOutcome {
    Created,
    AlreadyExists,
}

impl<C: Clock> Hipercow<C> {
    /// Create an environment; creating one that already exists is not an error
    pub fn environment_new(&self, name: &str, engine: &str) -> Result<EnvironmentOutcome> {
        if name == EMPTY_ENVIRONMENT {
            return Err(EngineError::Validation(format!(
                "Can't create environment with reserved name '{EMPTY_ENVIRONMENT}'"
            )));
        }
        if !CREATABLE_ENGINES.contains(&engine) {
            return Err(EngineError::Validation(format!(
                "Unknown environment engine '{engine}' (expected one of: {})",
                CREATABLE_ENGINES.join(", ")
            )));
        }
        if self.root().environment_exists(name) {
            return Ok(EnvironmentOutcome::AlreadyExists);
        }
        self.root().environment_create(name, &EnvironmentConfig::new(engine))?;
        Ok(EnvironmentOutcome::Created)
    }

    /// Created environments, plus `empty`
    pub fn environment_list(&self) -> Result<Vec<String>> {
        let mut names = self.root().environment_list()?;
        names.push(EMPTY_ENVIRONMENT.to_string());
        names.sort();
        names.dedup();
        Ok(names)
    }

    pub fn environment_delete(&self, name: &str) -> Result<()> {
        if name == EMPTY_ENVIRONMENT {
            return Err(EngineError::Validation(format!("Can't delete environment '{name}'")));
        }
        Ok(self.root().environment_delete(name)?)
    }

    pub fn environment_exists(&self, name: &str) -> bool {
        name == EMPTY_ENVIRONMENT || self.root().environment_exists(name)
    }

    /// Resolve the environment a task asks for; `None` means `default`
    pub fn environment_check(&self, name: Option<&str>) -> Result<String> {
        let name = name.unwrap_or(DEFAULT_ENVIRONMENT);
        if name == DEFAULT_ENVIRONMENT || self.environment_exists(name) {
            Ok(name.to_string())
        } else {
            Err(EngineError::NoSuchEnvironment(name.to_string()))
        }
    }
}

/// The engine managing `name` in `root`, built for `platform`
pub fn environment_engine(root: &Root, name: &str, platform: System) -> Result<Box<dyn EnvironmentEngine>> {
    if name == EMPTY_ENVIRONMENT {
        return Ok(Box::new(EmptyEngine));
    }
    let Some(config) = root.environment_config(name)? else {
        if name == DEFAULT_ENVIRONMENT {
            return Ok(Box::new(EmptyEngine));
        }
        return Err(EngineError::EnvironmentMissing(name.to_string()));
    };
    let context = EngineContext {
        project: root.path().to_path_buf(),
        contents: root.path_environment_contents(name),
        platform,
    };
    Ok(engine_for(&config.engine, context)?)
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
