use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::SessionKey;

/// Shared holder for the current session key.
///
/// Cloning is cheap and every clone sees the same credential. Any number of
/// readers may hold the lock at once; the handshake takes the write lock only
/// for the instant it stores a freshly obtained key.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<SessionKey>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `key`.
    pub fn with_key(key: SessionKey) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(key))),
        }
    }

    /// Returns the current key, or `None` until authentication succeeds.
    pub async fn get(&self) -> Option<SessionKey> {
        self.inner.read().await.clone()
    }

    pub async fn set(&self, key: SessionKey) {
        *self.inner.write().await = Some(key);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }
}
