use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use crate::error::FamlyError;
use crate::models::{Session, Store};

/// Returns the path to the household database file (`store.json`).
///
/// The path is determined in the following order:
/// 1. `FAMLY_DB` environment variable.
/// 2. `~/.local/share/famly/store.json` (on Linux).
/// 3. `./store.json` (fallback).
pub fn store_path() -> PathBuf {
    std::env::var("FAMLY_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("famly");
        p.push("store.json");
        p
    })
}

/// Returns the path to the session file (`session.json`).
///
/// Located in the same directory as the database.
pub fn session_path() -> PathBuf {
    let mut p = store_path();
    p.pop();
    p.push("session.json");
    p
}

/// Loads the stored snapshot. A missing file is an empty store.
pub fn load_store() -> Result<Store, FamlyError> {
    load_json(&store_path())
}

pub fn save_store(store: &Store) -> Result<(), FamlyError> {
    save_json(&store_path(), store)
}

/// Loads the session. A missing file means nobody is signed in.
pub fn load_session() -> Result<Session, FamlyError> {
    load_json(&session_path())
}

pub fn save_session(session: &Session) -> Result<(), FamlyError> {
    save_json(&session_path(), session)
}

/// Deletes the database and session files.
pub fn delete_database() -> Result<(), FamlyError> {
    for path in [store_path(), session_path()] {
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!(path = %path.display(), "removed data file");
        }
    }
    Ok(())
}

fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, FamlyError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no data file yet");
        return Ok(T::default());
    }
    let mut f = OpenOptions::new().read(true).open(path)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    let value = serde_json::from_str(&s)?;
    tracing::debug!(path = %path.display(), bytes = s.len(), "loaded data file");
    Ok(value)
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), FamlyError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let s = serde_json::to_string_pretty(value)?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    tracing::debug!(path = %path.display(), bytes = s.len(), "saved data file");
    Ok(())
}
