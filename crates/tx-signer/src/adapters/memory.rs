//! In-memory secret store adapter.
//!
//! Suitable for tests and single-process deployments; vault-backed stores
//! implement the same port.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::errors::SignerError;
use crate::ports::SecretStore;

/// Process-lifetime secret store.
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    keys: RwLock<HashMap<String, String>>,
}

impl InMemorySecretStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// Returns true when no key has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn store(&self, address: &str, hex_key: &str) -> Result<(), SignerError> {
        self.keys
            .write()
            .insert(address.to_owned(), hex_key.to_owned());
        Ok(())
    }

    async fn load(&self, address: &str) -> Result<Option<String>, SignerError> {
        Ok(self.keys.read().get(address).cloned())
    }
}
