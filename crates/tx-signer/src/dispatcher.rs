//! # Protocol Dispatcher
//!
//! Routes an envelope to exactly one protocol signer based on its declared
//! protocol tag. Dispatch goes through a lookup table: adding a protocol
//! means registering a table entry, never editing a switch.
//!
//! | Declared protocol | Route |
//! |-------------------|-------|
//! | None / unregistered | public Ethereum (fallback) |
//! | Ethereum | EIP-155 signer |
//! | Eea | EEA private signer |
//! | Tessera | Tessera private signer |
//! | Constellation | deliberate no-op (privacy enforced at the node) |

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use shared_types::{Envelope, Protocol};

use crate::domain::errors::SignerError;
use crate::keystore::AccountManager;
use crate::ports::SecretStore;

/// A signer strategy for one wire protocol.
///
/// Implementations write `raw` and `hash` onto the envelope; the
/// Constellation strategy intentionally writes neither.
#[async_trait]
pub trait ProtocolSigner: Send + Sync {
    /// Signs the envelope's transaction in place.
    async fn sign(&self, envelope: &mut Envelope) -> Result<(), SignerError>;
}

/// Lookup-table protocol router.
pub struct ProtocolDispatcher {
    table: HashMap<Protocol, Arc<dyn ProtocolSigner>>,
    fallback: Arc<dyn ProtocolSigner>,
}

impl ProtocolDispatcher {
    /// Creates a dispatcher with the given fallback for envelopes without a
    /// declared (or with an unregistered) protocol.
    pub fn new(fallback: Arc<dyn ProtocolSigner>) -> Self {
        Self {
            table: HashMap::new(),
            fallback,
        }
    }

    /// Registers a signer strategy for a protocol tag (builder style).
    #[must_use]
    pub fn register(mut self, protocol: Protocol, signer: Arc<dyn ProtocolSigner>) -> Self {
        self.table.insert(protocol, signer);
        self
    }

    /// Builds the standard table over one account manager: all four
    /// protocols registered, public Ethereum as the fallback.
    pub fn standard<S: SecretStore + 'static>(accounts: Arc<AccountManager<S>>) -> Self {
        let ethereum: Arc<dyn ProtocolSigner> = Arc::new(EthereumSigner::new(accounts.clone()));
        Self::new(ethereum.clone())
            .register(Protocol::Ethereum, ethereum)
            .register(Protocol::Eea, Arc::new(EeaSigner::new(accounts.clone())))
            .register(Protocol::Tessera, Arc::new(TesseraSigner::new(accounts)))
            .register(Protocol::Constellation, Arc::new(ConstellationSigner))
    }

    /// Routes the envelope to exactly one signer.
    pub async fn sign_envelope(&self, envelope: &mut Envelope) -> Result<(), SignerError> {
        let signer = envelope
            .protocol
            .as_ref()
            .and_then(|protocol| self.table.get(protocol))
            .unwrap_or(&self.fallback)
            .clone();
        signer.sign(envelope).await
    }
}

// =============================================================================
// PROTOCOL STRATEGIES
// =============================================================================

/// Public EIP-155 signer.
pub struct EthereumSigner<S> {
    accounts: Arc<AccountManager<S>>,
}

impl<S> EthereumSigner<S> {
    pub fn new(accounts: Arc<AccountManager<S>>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl<S: SecretStore + 'static> ProtocolSigner for EthereumSigner<S> {
    async fn sign(&self, envelope: &mut Envelope) -> Result<(), SignerError> {
        let session = self
            .accounts
            .signing_session(&envelope.from)
            .await?
            .with_chain_id(envelope.chain_id)?;
        let payload = session.execute_for_tx(&envelope.tx)?;
        envelope.raw = Some(payload.raw);
        envelope.hash = Some(payload.hash);
        Ok(())
    }
}

/// EEA privacy-group signer.
pub struct EeaSigner<S> {
    accounts: Arc<AccountManager<S>>,
}

impl<S> EeaSigner<S> {
    pub fn new(accounts: Arc<AccountManager<S>>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl<S: SecretStore + 'static> ProtocolSigner for EeaSigner<S> {
    async fn sign(&self, envelope: &mut Envelope) -> Result<(), SignerError> {
        let args = envelope
            .private_args
            .clone()
            .ok_or_else(|| SignerError::Data("EEA envelope without private args".into()))?;
        let session = self
            .accounts
            .signing_session(&envelope.from)
            .await?
            .with_chain_id(envelope.chain_id)?;
        let payload = session.execute_for_eea_tx(&envelope.tx, &args)?;
        envelope.raw = Some(payload.raw);
        envelope.hash = Some(payload.hash);
        Ok(())
    }
}

/// Tessera private-transaction signer.
pub struct TesseraSigner<S> {
    accounts: Arc<AccountManager<S>>,
}

impl<S> TesseraSigner<S> {
    pub fn new(accounts: Arc<AccountManager<S>>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl<S: SecretStore + 'static> ProtocolSigner for TesseraSigner<S> {
    async fn sign(&self, envelope: &mut Envelope) -> Result<(), SignerError> {
        let session = self
            .accounts
            .signing_session(&envelope.from)
            .await?
            .with_chain_id(envelope.chain_id)?;
        let payload = session.execute_for_tessera_tx(&envelope.tx)?;
        envelope.raw = Some(payload.raw);
        envelope.hash = Some(payload.hash);
        Ok(())
    }
}

/// Constellation strategy: signing is deliberately a no-op because privacy
/// is enforced at the node. Callers must not assume raw/hash are populated.
pub struct ConstellationSigner;

#[async_trait]
impl ProtocolSigner for ConstellationSigner {
    async fn sign(&self, envelope: &mut Envelope) -> Result<(), SignerError> {
        debug!(
            envelope_id = %envelope.id,
            "Constellation envelope: signing delegated to the node"
        );
        Ok(())
    }
}
