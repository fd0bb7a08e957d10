//! # Core Domain Entities
//!
//! Defines the transaction-level entities shared across all subsystems.
//!
//! ## Clusters
//!
//! - **Transaction**: `TxData`, the mutable field set filled in stage by stage
//! - **Privacy**: `PrivateArgs`, the EEA/Tessera privacy parameters

use serde::{Deserialize, Serialize};

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte hash (Keccak-256 in this system).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Formats an address as a lower-cased `0x`-prefixed hex string.
///
/// This is the canonical form used for repository keys and log fields.
pub fn address_to_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// The mutable transaction field set carried by an [`crate::Envelope`].
///
/// Fields start out unset and are filled in stage by stage: the crafter sets
/// the call payload, the gas handlers set `gas` and `gas_price`, and the
/// nonce handler sets `nonce`. Signing requires all of them to be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxData {
    /// Sender's account nonce (assigned by the nonce handler).
    pub nonce: Option<u64>,
    /// Gas limit (assigned by the gas-estimation handler).
    pub gas: Option<u64>,
    /// Gas price in wei (assigned by the gas-pricing handler).
    pub gas_price: Option<U256>,
    /// Transfer value in wei.
    pub value: U256,
    /// Call payload (contract call data; empty for plain transfers).
    pub data: Vec<u8>,
    /// Recipient address (None for contract creation).
    pub to: Option<Address>,
}

/// Privacy parameters for EEA and Tessera private transactions.
///
/// Exactly one of `private_for` / `privacy_group_id` must be set; the signer
/// rejects envelopes violating that invariant with a data error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrivateArgs {
    /// Base64-encoded public key of the sending privacy-manager node.
    pub private_from: String,
    /// Base64-encoded public keys of the recipient nodes.
    pub private_for: Vec<String>,
    /// Base64-encoded privacy group identifier (mutually exclusive with
    /// `private_for`).
    pub privacy_group_id: Option<String>,
    /// Private transaction restriction type (e.g. "restricted").
    pub private_tx_type: String,
}

impl PrivateArgs {
    /// Checks the mutual-exclusion invariant between `private_for` and
    /// `privacy_group_id`.
    ///
    /// Returns `false` when both or neither are set.
    #[must_use]
    pub fn has_exclusive_recipients(&self) -> bool {
        match self.privacy_group_id {
            Some(_) => self.private_for.is_empty(),
            None => !self.private_for.is_empty(),
        }
    }
}
