//! JSON persistence utilities
//!
//! Common patterns for loading and saving JSON state files. Saves go
//! through a sibling temp file plus rename so a crash mid-write never
//! leaves a truncated store behind.

use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// JSON store errors
#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    NotFound { path: String },
}

/// Result type for JSON store operations
pub type JsonStoreResult<T> = Result<T, JsonStoreError>;

/// Load JSON from a file path
pub fn load_json<T, P>(path: P) -> JsonStoreResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(JsonStoreError::NotFound {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&content)?;
    Ok(value)
}

/// Load JSON from file, returning default if the file doesn't exist.
///
/// A file that exists but fails to parse also yields the default, with a
/// warning: a corrupt store must never take the whole engine down.
pub fn load_json_or_default<T, P>(path: P) -> JsonStoreResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    match load_json(path.as_ref()) {
        Ok(value) => Ok(value),
        Err(JsonStoreError::NotFound { .. }) => Ok(T::default()),
        Err(JsonStoreError::Serialize(e)) => {
            warn!(
                path = %path.as_ref().display(),
                error = %e,
                "Ignoring corrupt JSON store, starting from defaults"
            );
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

/// Save value as JSON to a file path, creating parent directories.
pub fn save_json<T, P>(path: P, value: &T) -> JsonStoreResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
