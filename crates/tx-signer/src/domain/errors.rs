//! Signer error types.

use shared_types::{EnvelopeError, ErrorKind};
use thiserror::Error;

/// Errors produced by the signing subsystem.
#[derive(Debug, Clone, Error)]
pub enum SignerError {
    /// Malformed input (bad privacy arguments, missing tx fields, bad hex).
    #[error("Malformed input: {0}")]
    Data(String),

    /// Signing or encoding failure.
    #[error("Cryptographic operation failed: {0}")]
    CryptoOperation(String),

    /// Session used from an invalid state (e.g. zero chain id).
    #[error("Invalid session state: {0}")]
    FailedPrecondition(String),

    /// No account registered under the given address.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// Address collision on generate/import.
    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    /// The secret store backend is unreachable.
    #[error("Secret store unavailable: {0}")]
    StoreUnavailable(String),

    /// Requested signing method is not implemented for this backend.
    #[error("Not supported: {0}")]
    FeatureNotSupported(String),
}

impl SignerError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SignerError::Data(_) => ErrorKind::Data,
            SignerError::CryptoOperation(_) => ErrorKind::CryptoOperation,
            SignerError::FailedPrecondition(_) => ErrorKind::FailedPrecondition,
            SignerError::NotFound(_) => ErrorKind::NotFound,
            SignerError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            SignerError::StoreUnavailable(_) => ErrorKind::Connection,
            SignerError::FeatureNotSupported(_) => ErrorKind::FeatureNotSupported,
        }
    }

    /// Wraps the error into an envelope record tagged with `component`.
    #[must_use]
    pub fn into_envelope_error(self, component: &str) -> EnvelopeError {
        EnvelopeError::new(self.kind(), self.to_string(), component)
    }
}
