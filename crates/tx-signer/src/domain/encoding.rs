//! RLP layouts for the three wire protocols.
//!
//! All three protocols share the legacy base tuple
//! `[nonce, gasPrice, gas, to, value, data]`; they differ in what follows it:
//!
//! | Protocol | Suffix (sighash) | Suffix (wire) |
//! |----------|------------------|---------------|
//! | EIP-155 | `chainId, 0, 0` | `v, r, s` with `v = recId + chainId*2 + 35` |
//! | Homestead (Tessera) | none | `v, r, s` with the private marker V |
//! | EEA | `chainId, 0, 0, privateFrom, recipients, txType` | `v, r, s` + same privacy fields |

use primitive_types::U256;
use rlp::RlpStream;
use sha3::{Digest, Keccak256};

use shared_types::{Hash, TxData};

use crate::domain::errors::SignerError;

/// Keccak-256 convenience wrapper.
#[must_use]
pub fn keccak256(bytes: &[u8]) -> Hash {
    Keccak256::digest(bytes).into()
}

/// A transaction with every signing-relevant field resolved.
///
/// The pipeline fills `TxData` progressively; the signer refuses to operate
/// on an incomplete field set.
#[derive(Debug, Clone)]
pub struct ResolvedTx {
    pub nonce: u64,
    pub gas: u64,
    pub gas_price: U256,
    pub value: U256,
    pub data: Vec<u8>,
    pub to: Option<[u8; 20]>,
}

impl TryFrom<&TxData> for ResolvedTx {
    type Error = SignerError;

    fn try_from(tx: &TxData) -> Result<Self, Self::Error> {
        let nonce = tx
            .nonce
            .ok_or_else(|| SignerError::Data("transaction nonce not assigned".into()))?;
        let gas = tx
            .gas
            .ok_or_else(|| SignerError::Data("transaction gas not estimated".into()))?;
        let gas_price = tx
            .gas_price
            .ok_or_else(|| SignerError::Data("transaction gas price not set".into()))?;
        Ok(Self {
            nonce,
            gas,
            gas_price,
            value: tx.value,
            data: tx.data.clone(),
            to: tx.to,
        })
    }
}

/// Signature values substituted into a wire payload.
#[derive(Debug, Clone, Copy)]
pub struct SignatureValues {
    pub v: u64,
    pub r: U256,
    pub s: U256,
}

/// EEA recipient field: a privacy group id or an explicit recipient list.
#[derive(Debug, Clone)]
pub enum EeaRecipients {
    /// `privateFor`: encoded as an RLP list of byte strings.
    PrivateFor(Vec<Vec<u8>>),
    /// `privacyGroupId`: encoded as a single byte string.
    PrivacyGroup(Vec<u8>),
}

fn append_base(stream: &mut RlpStream, tx: &ResolvedTx) {
    stream.append(&tx.nonce);
    stream.append(&tx.gas_price);
    stream.append(&tx.gas);
    match &tx.to {
        Some(address) => stream.append(&address.to_vec()),
        None => stream.append_empty_data(),
    };
    stream.append(&tx.value);
    stream.append(&tx.data);
}

/// EIP-155 signing payload: `[base.., chainId, 0, 0]`.
#[must_use]
pub fn eip155_sighash_payload(tx: &ResolvedTx, chain_id: u64) -> Vec<u8> {
    let mut stream = RlpStream::new_list(9);
    append_base(&mut stream, tx);
    stream.append(&chain_id);
    stream.append(&0u8);
    stream.append(&0u8);
    stream.out().to_vec()
}

/// Homestead signing payload: the bare base tuple, no replay protection.
#[must_use]
pub fn homestead_sighash_payload(tx: &ResolvedTx) -> Vec<u8> {
    let mut stream = RlpStream::new_list(6);
    append_base(&mut stream, tx);
    stream.out().to_vec()
}

/// Signed legacy wire payload: `[base.., v, r, s]`.
#[must_use]
pub fn signed_legacy_payload(tx: &ResolvedTx, sig: &SignatureValues) -> Vec<u8> {
    let mut stream = RlpStream::new_list(9);
    append_base(&mut stream, tx);
    stream.append(&sig.v);
    stream.append(&sig.r);
    stream.append(&sig.s);
    stream.out().to_vec()
}

/// EEA private-transaction tuple.
///
/// With `sig = None` this is the hash preimage (`chainId, 0, 0` in the
/// signature slots); with a signature it is the wire payload.
#[must_use]
pub fn eea_payload(
    tx: &ResolvedTx,
    chain_id: u64,
    sig: Option<&SignatureValues>,
    private_from: &[u8],
    recipients: &EeaRecipients,
    private_tx_type: &str,
) -> Vec<u8> {
    let mut stream = RlpStream::new_list(12);
    append_base(&mut stream, tx);
    match sig {
        Some(sig) => {
            stream.append(&sig.v);
            stream.append(&sig.r);
            stream.append(&sig.s);
        }
        None => {
            stream.append(&chain_id);
            stream.append(&0u8);
            stream.append(&0u8);
        }
    }
    stream.append(&private_from.to_vec());
    match recipients {
        EeaRecipients::PrivateFor(keys) => {
            stream.begin_list(keys.len());
            for key in keys {
                stream.append(&key.to_vec());
            }
        }
        EeaRecipients::PrivacyGroup(group) => {
            stream.append(&group.to_vec());
        }
    }
    stream.append(&private_tx_type.as_bytes().to_vec());
    stream.out().to_vec()
}
