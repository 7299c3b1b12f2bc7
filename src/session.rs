//! Login session: the bearer token and cached user record.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::error::StorageError;
use crate::store::{KeyValueStore, keys};

/// Reads and clears the persisted credential used by the API client.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current bearer token. Missing, blank, or unreadable tokens read as `None`.
    pub async fn token(&self) -> Option<SecretString> {
        match self.store.get(keys::TOKEN).await {
            Ok(Some(serde_json::Value::String(token))) if !token.is_empty() => {
                Some(SecretString::from(token))
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    pub async fn is_logged_in(&self) -> bool {
        self.token().await.is_some()
    }

    /// Store the token and user record returned by a login.
    pub async fn login(
        &self,
        token: &SecretString,
        user: Option<&serde_json::Value>,
    ) -> Result<(), StorageError> {
        self.store
            .set(
                keys::TOKEN,
                &serde_json::Value::String(token.expose_secret().to_string()),
            )
            .await?;
        if let Some(user) = user {
            self.store.set(keys::USER, user).await?;
        }
        info!("Session stored");
        Ok(())
    }

    /// Cached user record, if any.
    pub async fn user(&self) -> Option<serde_json::Value> {
        match self.store.get(keys::USER).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Failed to read cached user: {}", e);
                None
            }
        }
    }

    /// Drop the token after the API rejected it.
    pub async fn clear_token(&self) {
        if let Err(e) = self.store.remove(keys::TOKEN).await {
            warn!("Failed to clear session token: {}", e);
        }
    }

    /// Drop both the token and the cached user.
    pub async fn logout(&self) {
        self.clear_token().await;
        if let Err(e) = self.store.remove(keys::USER).await {
            warn!("Failed to clear cached user: {}", e);
        }
        info!("Logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn login_then_logout() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store.clone());
        assert!(!session.is_logged_in().await);

        session
            .login(
                &SecretString::from("abc123"),
                Some(&serde_json::json!({"email": "jane@example.com"})),
            )
            .await
            .unwrap();
        assert_eq!(session.token().await.unwrap().expose_secret(), "abc123");
        assert!(session.user().await.is_some());

        session.logout().await;
        assert!(session.token().await.is_none());
        assert!(session.user().await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn clear_token_keeps_user() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store);
        session
            .login(&SecretString::from("t"), Some(&serde_json::json!({"id": 1})))
            .await
            .unwrap();
        session.clear_token().await;
        assert!(!session.is_logged_in().await);
        assert!(session.user().await.is_some());
    }

    #[tokio::test]
    async fn blank_token_is_logged_out() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(keys::TOKEN, &serde_json::Value::String(String::new()))
            .await
            .unwrap();
        assert!(!Session::new(store).is_logged_in().await);
    }
}
