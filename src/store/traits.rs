//! `KeyValueStore` trait: durable client-side storage for the draft and session.
//!
//! Values are JSON documents addressed by short fixed keys, the same shape as a
//! browser's local storage.

use async_trait::async_trait;

use crate::error::StorageError;

/// Well-known storage keys.
pub mod keys {
    /// Serialized wizard draft.
    pub const WIZARD_DRAFT: &str = "wizard-draft";
    /// Bearer token of the logged-in user.
    pub const TOKEN: &str = "token";
    /// Cached user record, cleared on logout.
    pub const USER: &str = "user";
}

/// Backend-agnostic key-value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    /// Write (overwrite) the value under `key`.
    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reject keys that could escape a storage directory or collide on disk.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
