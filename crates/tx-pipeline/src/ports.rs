//! Outbound ports for external collaborators.
//!
//! The pipeline consumes these services, it does not implement them: gas
//! estimation and pricing, raw-transaction broadcast, and the privacy
//! manager sidecar. Adapters live with the deployment, not here.

use async_trait::async_trait;
use primitive_types::U256;
use thiserror::Error;

use shared_types::{Address, ErrorKind, Hash, TxData};

/// Failure class reported by an external collaborator.
///
/// Transient failures are retry candidates (upstream overloaded, connection
/// reset); permanent failures must surface immediately (malformed request,
/// rejected payload).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transient upstream failure: {0}")]
    Transient(String),

    #[error("permanent upstream failure: {0}")]
    Permanent(String),
}

impl ClientError {
    /// Returns true when a retry could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Maps the failure class onto the shared error taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transient(_) => ErrorKind::Connection,
            Self::Permanent(_) => ErrorKind::Data,
        }
    }
}

/// Gas limit estimation for a not-yet-signed transaction.
#[async_trait]
pub trait GasEstimator: Send + Sync {
    /// Estimates the gas limit the transaction needs on the given chain.
    async fn estimate_gas(
        &self,
        chain_id: u64,
        from: &Address,
        tx: &TxData,
    ) -> Result<u64, ClientError>;
}

/// Current gas price quotation.
#[async_trait]
pub trait GasPricer: Send + Sync {
    /// Quotes a gas price for the given chain.
    async fn gas_price(&self, chain_id: u64) -> Result<U256, ClientError>;
}

/// Raw-transaction broadcast.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    /// Submits the signed payload, returning the hash acknowledged by the
    /// chain.
    async fn send_raw(&self, chain_id: u64, raw: &[u8]) -> Result<Hash, ClientError>;
}

/// Privacy manager sidecar (Tessera-style).
///
/// Every chain has its own privacy manager; the chain id on each operation
/// selects which one the adapter talks to.
#[async_trait]
pub trait PrivacyManagerClient: Send + Sync {
    /// Stores a private payload with the given chain's privacy manager,
    /// returning the enclave key that replaces the payload on the public
    /// chain.
    async fn store_raw(
        &self,
        chain_id: u64,
        payload: &[u8],
        private_from: &str,
    ) -> Result<Vec<u8>, ClientError>;

    /// Liveness probe against the given chain's privacy manager; returns
    /// its status line.
    async fn get_status(&self, chain_id: u64) -> Result<String, ClientError>;
}
