//! Secret store port.
//!
//! Persistence is contract-only: the keystore talks to any backend that can
//! store and load hex-encoded private keys by lower-cased hex address.

use async_trait::async_trait;

use crate::domain::errors::SignerError;

/// Account secret store.
///
/// Addresses are always passed in canonical lower-cased `0x` hex form; the
/// backend must treat them as opaque keys.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Persists a private key under the given address.
    async fn store(&self, address: &str, hex_key: &str) -> Result<(), SignerError>;

    /// Loads the private key stored under the given address, or `None` when
    /// the address is unknown.
    async fn load(&self, address: &str) -> Result<Option<String>, SignerError>;
}
