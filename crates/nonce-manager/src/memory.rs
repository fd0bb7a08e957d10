//! In-memory nonce cache adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::ports::{NonceCache, NonceError, NonceKey};

/// Process-lifetime, last-write-wins nonce cache.
///
/// Suitable for single-process deployments and tests; durable backends plug
/// in through the same [`NonceCache`] port.
#[derive(Debug, Default)]
pub struct InMemoryNonceCache {
    entries: RwLock<HashMap<NonceKey, u64>>,
}

impl InMemoryNonceCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently attributed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true when no attribution has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl NonceCache for InMemoryNonceCache {
    async fn get_last_attributed(&self, key: &NonceKey) -> Result<Option<u64>, NonceError> {
        Ok(self.entries.read().get(key).copied())
    }

    async fn set_last_attributed(&self, key: &NonceKey, nonce: u64) -> Result<(), NonceError> {
        self.entries.write().insert(*key, nonce);
        Ok(())
    }
}
