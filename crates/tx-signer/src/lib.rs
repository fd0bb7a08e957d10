//! # Transaction Signer
//!
//! Multi-protocol signing for the transaction pipeline: key management, the
//! one-shot signing session, and protocol dispatch.
//!
//! ## Components
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `domain::account` | secp256k1 key pairs, keccak address derivation |
//! | `domain::encoding` | RLP layouts for the three wire protocols |
//! | `domain::session` | Type-state signing session (one per request) |
//! | `keystore` | Account repository behind the `SecretStore` port |
//! | `dispatcher` | Protocol lookup table routing envelopes to signers |
//!
//! ## Supported Protocols
//!
//! - **Public Ethereum**: EIP-155 replay-protected legacy transactions.
//! - **EEA**: privacy-group private transactions; the signature covers the
//!   extended RLP tuple including the privacy fields.
//! - **Tessera**: pre-EIP-155 homestead signing with the private V marker
//!   (37/38) and a privacy-manager-specific hash.
//! - **Constellation**: deliberate no-op; privacy is enforced at the node.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces and low-S normalization via the k256
//!   ECDSA stack.
//! - Private key material never leaves the signing boundary; secret bytes
//!   are zeroized on drop.

#![warn(clippy::all)]

pub mod adapters;
pub mod dispatcher;
pub mod domain;
pub mod keystore;
pub mod ports;

pub use adapters::InMemorySecretStore;
pub use dispatcher::{
    ConstellationSigner, EeaSigner, EthereumSigner, ProtocolDispatcher, ProtocolSigner,
    TesseraSigner,
};
pub use domain::account::Account;
pub use domain::errors::SignerError;
pub use domain::scheme::{RecoverableEcdsa, SignatureScheme};
pub use domain::session::{AccountSet, Ready, SignedPayload, SigningSession, Unconfigured};
pub use keystore::AccountManager;
pub use ports::SecretStore;
