//! secp256k1 account key pairs.
//!
//! Keys are held inside the signing boundary only; the rest of the system
//! sees addresses. Secret bytes are zeroized on drop.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use shared_types::{address_to_hex, Address, Hash};

use crate::domain::errors::SignerError;

/// An account: Ethereum-style address plus the secp256k1 signing key.
#[derive(Clone)]
pub struct Account {
    address: Address,
    signing_key: SigningKey,
}

impl Account {
    /// Generates a fresh random account.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::random(&mut rand::thread_rng()))
    }

    /// Builds an account from a hex-encoded 32-byte private key, with or
    /// without a `0x` prefix.
    pub fn from_hex_key(hex_key: &str) -> Result<Self, SignerError> {
        let stripped = hex_key.trim_start_matches("0x");
        let mut bytes = hex::decode(stripped)
            .map_err(|e| SignerError::Data(format!("invalid private key hex: {e}")))?;
        if bytes.len() != 32 {
            bytes.zeroize();
            return Err(SignerError::Data(format!(
                "private key must be 32 bytes, got {}",
                stripped.len() / 2
            )));
        }
        let signing_key = SigningKey::from_slice(&bytes)
            .map_err(|e| SignerError::Data(format!("invalid private key scalar: {e}")))?;
        bytes.zeroize();
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = address_of(signing_key.verifying_key());
        Self {
            address,
            signing_key,
        }
    }

    /// The account's 20-byte address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The canonical lower-cased `0x` hex form of the address, used as the
    /// repository key.
    #[must_use]
    pub fn address_hex(&self) -> String {
        address_to_hex(&self.address)
    }

    /// Hex-encodes the private key for secret-store persistence.
    ///
    /// Only the keystore calls this; the value never crosses the signing
    /// boundary.
    #[must_use]
    pub(crate) fn to_hex_key(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Signs a 32-byte digest, returning the signature and recovery id with
    /// low-S normalization applied.
    pub fn sign_digest_recoverable(
        &self,
        digest: &Hash,
    ) -> Result<(Signature, RecoveryId), SignerError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|e| SignerError::CryptoOperation(format!("ecdsa signing failed: {e}")))?;

        // Low-S normalization (EIP-2); flipping S flips the recovery parity.
        match signature.normalize_s() {
            Some(normalized) => {
                let flipped = RecoveryId::from_byte(recovery_id.to_byte() ^ 1).ok_or_else(
                    || SignerError::CryptoOperation("recovery id out of range".into()),
                )?;
                Ok((normalized, flipped))
            }
            None => Ok((signature, recovery_id)),
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("Account")
            .field("address", &self.address_hex())
            .finish_non_exhaustive()
    }
}

impl Drop for Account {
    fn drop(&mut self) {
        // Zeroize secret key material
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}

/// Derives the Ethereum address: last 20 bytes of keccak256 over the
/// uncompressed public key without the 0x04 tag byte.
fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}
