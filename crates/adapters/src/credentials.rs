// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DIDE credential storage.
//!
//! Secrets live under logical names in a small JSON file in the user's
//! config directory.
//! `DIDE_USERNAME`/`DIDE_PASSWORD` take precedence when both are set.

use crate::env;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DOMAIN_PREFIX: &str = "DIDE\\";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Did not find your DIDE credentials, please run 'hipercow dide authenticate'")]
    Missing,
    #[error("invalid username '{0}': {1}")]
    InvalidUsername(String, &'static str),
    #[error("no location for the credentials file; set HIPERCOW_CREDENTIALS")]
    NoPath,
    #[error("credentials file '{path}': {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("credentials file '{path}' is corrupt: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Normalise a username, dropping any `DIDE\` domain prefix
pub fn check_username(username: &str) -> Result<String, CredentialError> {
    let trimmed = username.trim();
    let name = trimmed.strip_prefix(DOMAIN_PREFIX).unwrap_or(trimmed);
    let invalid = |why| Err(CredentialError::InvalidUsername(username.to_string(), why));
    if name.is_empty() {
        return invalid("empty username");
    }
    if name.contains(['\n', '\r']) {
        return invalid("contains a newline");
    }
    if name.contains(char::is_whitespace) {
        return invalid("contains a space");
    }
    if name.contains('#') {
        return invalid("contains '#'");
    }
    Ok(name.to_string())
}

/// Logical names under which the DIDE login is kept
pub const USERNAME_KEY: &str = "hipercow/dide/username";
pub const PASSWORD_KEY: &str = "hipercow/dide/password";

/// Secrets kept between sessions, addressed by logical name
pub trait CredentialStore: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>, CredentialError>;
    fn set(&self, name: &str, value: &str) -> Result<(), CredentialError>;
    /// Returns whether anything was removed
    fn delete(&self, name: &str) -> Result<bool, CredentialError>;
}

/// The stored DIDE login, if both halves are present
pub fn stored_credentials(store: &dyn CredentialStore) -> Result<Option<Credentials>, CredentialError> {
    let username = store.get(USERNAME_KEY)?;
    let password = store.get(PASSWORD_KEY)?;
    Ok(username.zip(password).map(|(username, password)| Credentials { username, password }))
}

pub fn store_credentials(store: &dyn CredentialStore, credentials: &Credentials) -> Result<(), CredentialError> {
    store.set(USERNAME_KEY, &credentials.username)?;
    store.set(PASSWORD_KEY, &credentials.password)
}

/// Forget the DIDE login; returns whether anything was stored
pub fn clear_credentials(store: &dyn CredentialStore) -> Result<bool, CredentialError> {
    let username = store.delete(USERNAME_KEY)?;
    let password = store.delete(PASSWORD_KEY)?;
    Ok(username || password)
}

/// Secrets in a JSON object file, created readable only by the owner on Unix
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location (see [`env::credentials_path`])
    pub fn from_env() -> Result<Self, CredentialError> {
        env::credentials_path().map(Self::new).ok_or(CredentialError::NoPath)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io(&self) -> impl FnOnce(std::io::Error) -> CredentialError + '_ {
        move |source| CredentialError::Io { path: self.path.clone(), source }
    }

    fn read(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io()(e)),
        };
        serde_json::from_str(&text).map_err(|source| CredentialError::Json { path: self.path.clone(), source })
    }

    /// Replace the file through a temporary created with owner-only
    /// permissions; an empty map removes the file
    fn write(&self, values: &BTreeMap<String, String>) -> Result<(), CredentialError> {
        if values.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(self.io()(e)),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(self.io())?;
        }
        let json = serde_json::to_vec_pretty(values)
            .map_err(|source| CredentialError::Json { path: self.path.clone(), source })?;
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let _ = std::fs::remove_file(&tmp);
        let mut file = private_file(&tmp).map_err(self.io())?;
        file.write_all(&json).map_err(self.io())?;
        drop(file);
        std::fs::rename(&tmp, &self.path).map_err(self.io())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, name: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.read()?.remove(name))
    }

    fn set(&self, name: &str, value: &str) -> Result<(), CredentialError> {
        let mut values = self.read()?;
        values.insert(name.to_string(), value.to_string());
        self.write(&values)?;
        tracing::info!(path = %self.path.display(), name, "saved credential");
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool, CredentialError> {
        let mut values = self.read()?;
        if values.remove(name).is_none() {
            return Ok(false);
        }
        self.write(&values)?;
        Ok(true)
    }
}

#[cfg(unix)]
fn private_file(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    std::fs::OpenOptions::new().write(true).create_new(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn private_file(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new().write(true).create_new(true).open(path)
}

/// Credentials from the environment if set, else from `store`
pub fn load_credentials(store: &dyn CredentialStore) -> Result<Credentials, CredentialError> {
    if let Some((username, password)) = env::dide_credentials() {
        return Ok(Credentials::new(check_username(&username)?, password));
    }
    stored_credentials(store)?.ok_or(CredentialError::Missing)
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod memory {
    use super::{CredentialError, CredentialStore, Credentials, PASSWORD_KEY, USERNAME_KEY};
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    /// In-memory credential store for tests
    #[derive(Clone, Default)]
    pub struct MemoryCredentialStore {
        inner: Arc<Mutex<BTreeMap<String, String>>>,
    }

    impl MemoryCredentialStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(credentials: Credentials) -> Self {
            let values = BTreeMap::from([
                (USERNAME_KEY.to_string(), credentials.username),
                (PASSWORD_KEY.to_string(), credentials.password),
            ]);
            Self { inner: Arc::new(Mutex::new(values)) }
        }
    }

    impl CredentialStore for MemoryCredentialStore {
        fn get(&self, name: &str) -> Result<Option<String>, CredentialError> {
            Ok(self.inner.lock().get(name).cloned())
        }

        fn set(&self, name: &str, value: &str) -> Result<(), CredentialError> {
            self.inner.lock().insert(name.to_string(), value.to_string());
            Ok(())
        }

        fn delete(&self, name: &str) -> Result<bool, CredentialError> {
            Ok(self.inner.lock().remove(name).is_some())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryCredentialStore;

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
