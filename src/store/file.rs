//! File-backed key-value store: one JSON file per key under a directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::traits::{KeyValueStore, validate_key};
use crate::error::StorageError;

/// Stores each key as `<dir>/<key>.json`.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `base_path`, creating the directory if needed.
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        debug!(path = %base_path.display(), "File store opened");
        Ok(Self { base_path })
    }

    /// Directory this store writes into.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let path = self.path_for(key)?;
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(value)?;
        // Write a sibling temp file, then rename over the target.
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
