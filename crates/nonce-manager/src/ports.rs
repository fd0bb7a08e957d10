//! Outbound ports for the nonce manager.
//!
//! Persistence is contract-only: any backend satisfying [`NonceCache`] can be
//! plugged in at construction time (the in-memory adapter ships with this
//! crate, durable backends live elsewhere).

use async_trait::async_trait;
use shared_types::{address_to_hex, Address};
use thiserror::Error;

/// Cache key: one nonce sequence exists per (chain, sender) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonceKey {
    /// Target chain identifier.
    pub chain_id: u64,
    /// Sender account address.
    pub address: Address,
}

impl NonceKey {
    /// Creates a key for the given chain and sender.
    pub fn new(chain_id: u64, address: Address) -> Self {
        Self { chain_id, address }
    }
}

impl std::fmt::Display for NonceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", address_to_hex(&self.address), self.chain_id)
    }
}

/// Nonce manager failures.
#[derive(Debug, Clone, Error)]
pub enum NonceError {
    /// The cache backend could not be reached or rejected the operation.
    #[error("Nonce cache unavailable: {0}")]
    CacheUnavailable(String),

    /// The chain's pending-nonce query failed.
    #[error("Chain state query failed for chain {chain_id}: {message}")]
    ChainQueryFailed { chain_id: u64, message: String },
}

/// Last-attributed nonce cache, keyed by (chain, sender).
///
/// Values are monotonically non-decreasing except on explicit recovery
/// override. The cache is last-write-wins and must be internally
/// synchronized; it is the only state shared across envelope tasks.
#[async_trait]
pub trait NonceCache: Send + Sync {
    /// Returns the last attributed nonce for `key`, or `None` when no
    /// attribution has been recorded.
    async fn get_last_attributed(&self, key: &NonceKey) -> Result<Option<u64>, NonceError>;

    /// Records `nonce` as the last attributed value for `key`.
    async fn set_last_attributed(&self, key: &NonceKey, nonce: u64) -> Result<(), NonceError>;
}

/// Chain pending-nonce reader, used only on cache miss.
///
/// The chain-reported value already represents the next free slot and is
/// used unmodified.
#[async_trait]
pub trait ChainStateReader: Send + Sync {
    /// Returns the pending nonce for `address` on `chain_id`.
    async fn pending_nonce_at(&self, chain_id: u64, address: &Address)
        -> Result<u64, NonceError>;
}
