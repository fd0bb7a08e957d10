//! # Type-State Signing Session
//!
//! One-shot, per-request cryptographic unit bound to one account and one
//! chain. The configuration order is enforced at compile time and every
//! execute method consumes the session, making reuse impossible:
//!
//! ```text
//! [Unconfigured] ──with_account──→ [AccountSet] ──with_chain_id──→ [Ready]
//!                                                                     │
//!                                              execute_* (consumes) ──┘
//! ```
//!
//! The only session misuse the type system cannot express is a zero chain
//! id, which fails at `with_chain_id` with a precondition error.

use std::marker::PhantomData;

use base64::Engine as _;
use primitive_types::U256;

use shared_types::{Hash, PrivateArgs, TxData};

use crate::domain::account::Account;
use crate::domain::encoding::{
    eea_payload, eip155_sighash_payload, homestead_sighash_payload, keccak256,
    signed_legacy_payload, EeaRecipients, ResolvedTx, SignatureValues,
};
use crate::domain::errors::SignerError;
use crate::domain::scheme::SignatureScheme;

/// Tessera's private-chain V marker base (37 for even parity, 38 for odd).
const PRIVATE_V_BASE: u64 = 37;

/// Largest chain id whose EIP-155 V value (`recId + chainId*2 + 35`,
/// recId <= 1) still fits in a u64.
const MAX_CHAIN_ID: u64 = (u64::MAX - 36) / 2;

// =============================================================================
// STATE MARKERS (Zero-Sized Types)
// =============================================================================

/// Marker: no account or chain bound yet.
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured;

/// Marker: account bound, chain still missing.
#[derive(Debug, Clone, Copy)]
pub struct AccountSet;

/// Marker: account and chain bound; execute methods available.
#[derive(Debug, Clone, Copy)]
pub struct Ready;

/// The output of a signing execution: wire bytes plus the hash downstream
/// components address the transaction by.
#[derive(Debug, Clone)]
pub struct SignedPayload {
    /// RLP-encoded wire payload.
    pub raw: Vec<u8>,
    /// Transaction hash (protocol-specific; see the execute methods).
    pub hash: Hash,
}

/// One-shot signing session with compile-time enforced configuration order.
#[derive(Debug)]
pub struct SigningSession<S> {
    account: Option<Account>,
    chain_id: u64,
    _state: PhantomData<S>,
}

impl Default for SigningSession<Unconfigured> {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningSession<Unconfigured> {
    /// Creates an unconfigured session.
    pub fn new() -> Self {
        Self {
            account: None,
            chain_id: 0,
            _state: PhantomData,
        }
    }

    /// Binds the account. Consumes the unconfigured session.
    #[must_use]
    pub fn with_account(self, account: Account) -> SigningSession<AccountSet> {
        SigningSession {
            account: Some(account),
            chain_id: 0,
            _state: PhantomData,
        }
    }
}

impl SigningSession<AccountSet> {
    /// Binds the chain. A zero chain id has no valid EIP-155 encoding, and
    /// one past [`MAX_CHAIN_ID`] would overflow the V computation; both are
    /// rejected up front.
    pub fn with_chain_id(self, chain_id: u64) -> Result<SigningSession<Ready>, SignerError> {
        if chain_id == 0 {
            return Err(SignerError::FailedPrecondition(
                "chain id must be non-zero".into(),
            ));
        }
        if chain_id > MAX_CHAIN_ID {
            return Err(SignerError::FailedPrecondition(format!(
                "chain id {chain_id} exceeds the EIP-155 V range"
            )));
        }
        Ok(SigningSession {
            account: self.account,
            chain_id,
            _state: PhantomData,
        })
    }
}

impl SigningSession<Ready> {
    fn account(&self) -> &Account {
        match &self.account {
            Some(account) => account,
            // Type state guarantees the account was bound in AccountSet.
            None => unreachable!("Ready session without account"),
        }
    }

    /// Signs a public EIP-155 transaction.
    ///
    /// Returns the RLP wire payload and the standard transaction hash
    /// (keccak over the signed encoding).
    pub fn execute_for_tx(self, tx: &TxData) -> Result<SignedPayload, SignerError> {
        let resolved = ResolvedTx::try_from(tx)?;
        // The chain id is copied out once and used for both sighash and V so
        // the two can never disagree.
        let chain_id = self.chain_id;

        let sighash = keccak256(&eip155_sighash_payload(&resolved, chain_id));
        let (signature, recovery_id) = self.account().sign_digest_recoverable(&sighash)?;
        let sig = SignatureValues {
            v: u64::from(recovery_id.to_byte()) + chain_id * 2 + 35,
            r: signature_r(&signature),
            s: signature_s(&signature),
        };

        let raw = signed_legacy_payload(&resolved, &sig);
        let hash = keccak256(&raw);
        Ok(SignedPayload { raw, hash })
    }

    /// Signs an EEA privacy-group private transaction.
    ///
    /// The signature covers the extended tuple including the privacy fields;
    /// the returned hash is that preimage hash (the EEA private tx is
    /// addressed by it, not by a hash of the wire bytes).
    pub fn execute_for_eea_tx(
        self,
        tx: &TxData,
        args: &PrivateArgs,
    ) -> Result<SignedPayload, SignerError> {
        if !args.has_exclusive_recipients() {
            return Err(SignerError::Data(
                "exactly one of privateFor / privacyGroupId must be set".into(),
            ));
        }
        let private_from = decode_base64("privateFrom", &args.private_from)?;
        let recipients = match &args.privacy_group_id {
            Some(group) => EeaRecipients::PrivacyGroup(decode_base64("privacyGroupId", group)?),
            None => {
                let mut keys = Vec::with_capacity(args.private_for.len());
                for key in &args.private_for {
                    keys.push(decode_base64("privateFor", key)?);
                }
                EeaRecipients::PrivateFor(keys)
            }
        };

        let resolved = ResolvedTx::try_from(tx)?;
        let chain_id = self.chain_id;

        let preimage = eea_payload(
            &resolved,
            chain_id,
            None,
            &private_from,
            &recipients,
            &args.private_tx_type,
        );
        let hash = keccak256(&preimage);

        // The raw hash is signed directly with the account key; the EEA
        // payload is not a standard transaction sighash.
        let (signature, recovery_id) = self.account().sign_digest_recoverable(&hash)?;
        let sig = SignatureValues {
            v: u64::from(recovery_id.to_byte()) + chain_id * 2 + 35,
            r: signature_r(&signature),
            s: signature_s(&signature),
        };

        let raw = eea_payload(
            &resolved,
            chain_id,
            Some(&sig),
            &private_from,
            &recipients,
            &args.private_tx_type,
        );
        Ok(SignedPayload { raw, hash })
    }

    /// Signs a Tessera-style private transaction.
    ///
    /// Signing uses the homestead sighash (no chain-id replay protection,
    /// Tessera's pre-EIP-155 convention) but the V value is forced to the
    /// private-chain marker 37/38 regardless of the input. The hash is
    /// recomputed over the private-V tuple because the privacy manager
    /// addresses the transaction by it, not by the public tx hash.
    pub fn execute_for_tessera_tx(self, tx: &TxData) -> Result<SignedPayload, SignerError> {
        let resolved = ResolvedTx::try_from(tx)?;

        let sighash = keccak256(&homestead_sighash_payload(&resolved));
        let (signature, recovery_id) = self.account().sign_digest_recoverable(&sighash)?;
        let sig = SignatureValues {
            v: PRIVATE_V_BASE + u64::from(recovery_id.to_byte()),
            r: signature_r(&signature),
            s: signature_s(&signature),
        };

        let raw = signed_legacy_payload(&resolved, &sig);
        let hash = keccak256(&raw);
        Ok(SignedPayload { raw, hash })
    }

    /// Keccak-hashes an arbitrary message and signs it via the injected
    /// signature scheme.
    pub fn execute_for_msg(
        self,
        msg: &[u8],
        scheme: &dyn SignatureScheme,
    ) -> Result<Vec<u8>, SignerError> {
        let digest = keccak256(msg);
        scheme.sign_digest(self.account(), &digest)
    }
}

fn signature_r(signature: &k256::ecdsa::Signature) -> U256 {
    U256::from_big_endian(&signature.to_bytes()[..32])
}

fn signature_s(signature: &k256::ecdsa::Signature) -> U256 {
    U256::from_big_endian(&signature.to_bytes()[32..])
}

fn decode_base64(field: &str, value: &str) -> Result<Vec<u8>, SignerError> {
    base64::engine::general_purpose::STANDARD
        .decode(value)
        .map_err(|e| SignerError::Data(format!("{field} is not valid base64: {e}")))
}
