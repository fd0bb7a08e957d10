//! Pluggable digital-signature strategy for message signing.
//!
//! Transactions always go through the protocol-specific paths; free-form
//! message signing is strategy-injected so the scheme can be swapped without
//! touching the session.

use shared_types::Hash;

use crate::domain::account::Account;
use crate::domain::errors::SignerError;

/// A digital-signature algorithm applied to a 32-byte digest.
pub trait SignatureScheme: Send + Sync {
    /// Signs the digest with the account's key, returning the raw signature
    /// bytes in the scheme's canonical serialization.
    fn sign_digest(&self, account: &Account, digest: &Hash) -> Result<Vec<u8>, SignerError>;
}

/// Default scheme: recoverable secp256k1 ECDSA, serialized `r || s || recId`
/// (65 bytes).
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoverableEcdsa;

impl SignatureScheme for RecoverableEcdsa {
    fn sign_digest(&self, account: &Account, digest: &Hash) -> Result<Vec<u8>, SignerError> {
        let (signature, recovery_id) = account.sign_digest_recoverable(digest)?;
        let mut bytes = Vec::with_capacity(65);
        bytes.extend_from_slice(&signature.to_bytes());
        bytes.push(recovery_id.to_byte());
        Ok(bytes)
    }
}
