//! # Transaction Envelope
//!
//! The universal record flowing through the handler chain.
//!
//! ## Properties
//!
//! - **Single Owner**: exactly one pipeline task owns an envelope while it is
//!   in flight; handlers mutate it in place.
//! - **Error Accumulation**: failures are recorded as structured
//!   [`EnvelopeError`] entries in order; warnings never abort the chain.
//! - **Metadata Side Channel**: free-form string metadata carries operator
//!   signals (e.g. the nonce recovery override) between stages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Address, Hash, PrivateArgs, TxData};
use crate::errors::EnvelopeError;
use crate::protocol::Protocol;

/// Metadata key carrying an explicit nonce recovery override.
///
/// When present, the nonce handler uses the value verbatim, clears the key,
/// and skips the cache.
pub const NONCE_RECOVERY_KEY: &str = "nonce.recovery.expected";

/// The transaction intent plus accumulated metadata and errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Unique envelope identifier, used for correlation in logs.
    pub id: Uuid,
    /// Target chain identifier (EIP-155 chain id).
    pub chain_id: u64,
    /// Sender account address.
    pub from: Address,
    /// Mutable transaction fields, filled in stage by stage.
    pub tx: TxData,
    /// Signed wire payload, set by the signing stage.
    pub raw: Option<Vec<u8>>,
    /// Transaction hash, set by the signing stage.
    pub hash: Option<Hash>,
    /// Declared wire protocol; None defaults to public Ethereum.
    pub protocol: Option<Protocol>,
    /// Privacy parameters for EEA/Tessera protocols.
    pub private_args: Option<PrivateArgs>,
    /// Free-form metadata (operator signals, correlation ids).
    pub metadata: HashMap<String, String>,
    /// Ordered list of errors recorded while processing.
    pub errors: Vec<EnvelopeError>,
}

impl Envelope {
    /// Creates a new envelope for the given chain and sender.
    pub fn new(chain_id: u64, from: Address) -> Self {
        Self {
            id: Uuid::new_v4(),
            chain_id,
            from,
            tx: TxData::default(),
            raw: None,
            hash: None,
            protocol: None,
            private_args: None,
            metadata: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Sets the declared protocol (builder style).
    #[must_use]
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Sets the privacy arguments (builder style).
    #[must_use]
    pub fn with_private_args(mut self, args: PrivateArgs) -> Self {
        self.private_args = Some(args);
        self
    }

    /// Sets a metadata entry (builder style).
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Records an error on the envelope.
    pub fn record_error(&mut self, error: EnvelopeError) {
        self.errors.push(error);
    }

    /// Returns true when at least one non-warning error has been recorded.
    #[must_use]
    pub fn has_fatal_errors(&self) -> bool {
        self.errors.iter().any(EnvelopeError::is_fatal)
    }

    /// Counts the non-warning errors recorded so far.
    #[must_use]
    pub fn fatal_error_count(&self) -> usize {
        self.errors.iter().filter(|e| e.is_fatal()).count()
    }

    /// Removes and returns a metadata entry.
    pub fn take_metadata(&mut self, key: &str) -> Option<String> {
        self.metadata.remove(key)
    }

    /// Removes and returns the nonce recovery override, if signalled.
    ///
    /// The signal is cleared as soon as it is read, even when later stages
    /// fail. A malformed signal is still cleared but recorded as a warning
    /// so the bad operator input stays observable.
    pub fn take_nonce_recovery(&mut self) -> Option<u64> {
        let value = self.take_metadata(NONCE_RECOVERY_KEY)?;
        match value.parse() {
            Ok(nonce) => Some(nonce),
            Err(_) => {
                self.record_error(EnvelopeError::warning(
                    format!("ignoring malformed nonce recovery signal {value:?}"),
                    "envelope",
                ));
                None
            }
        }
    }
}
