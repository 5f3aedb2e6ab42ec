// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Small file helpers shared by the store modules

use crate::{Result, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Write `value` as pretty JSON, atomically replacing any existing file.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|source| StorageError::Json { path: path.to_path_buf(), source })?;
    write_atomic(path, &json)
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(StorageError::io(parent))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes).map_err(StorageError::io(&tmp))?;
    fs::rename(&tmp, path).map_err(StorageError::io(path))
}

/// Create `path` with `bytes` only if it does not already exist.
///
/// Returns `Ok(false)` when the file was already present.
pub(crate) fn create_exclusive(path: &Path, bytes: &[u8]) -> Result<bool> {
    let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(StorageError::io(path)(e)),
    };
    file.write_all(bytes).map_err(StorageError::io(path))?;
    Ok(true)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(StorageError::io(path))?;
    serde_json::from_slice(&bytes)
        .map_err(|source| StorageError::Json { path: path.to_path_buf(), source })
}

pub(crate) fn read_json_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if path.exists() {
        read_json(path).map(Some)
    } else {
        Ok(None)
    }
}

pub(crate) fn check_version(kind: &'static str, path: &Path, found: u32, expected: u32) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(StorageError::Version { kind, path: path.to_path_buf(), found, expected })
    }
}

/// Sorted names of entries in `dir`; empty if the directory is absent.
pub(crate) fn list_names(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::io(dir)(e)),
    };
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(StorageError::io(dir))?;
        if let Some(name) = entry.file_name().to_str() {
            if !name.ends_with(".tmp") {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Best-known creation time of a file, falling back to its mtime.
pub(crate) fn created_ms(path: &Path) -> Option<u64> {
    let meta = fs::metadata(path).ok()?;
    meta.created().or_else(|_| meta.modified()).ok().map(to_epoch_ms)
}

pub(crate) fn modified_ms(path: &Path) -> Option<u64> {
    fs::metadata(path).and_then(|m| m.modified()).ok().map(to_epoch_ms)
}

fn to_epoch_ms(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// Names that become a single path component: non-empty, no separators,
/// no leading dot.
pub(crate) fn check_name(kind: &'static str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName { kind, name: name.to_string() })
    }
}
