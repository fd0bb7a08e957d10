//! # Error Taxonomy
//!
//! Defines the error classes shared by every subsystem and the structured
//! error record accumulated on envelopes.
//!
//! Warnings are the only non-fatal class: they are recorded but never count
//! toward the abort threshold of the handler chain.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error classes recognized across the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or inconsistent input (e.g. bad privacy arguments).
    Data,
    /// Signing or encoding failure.
    CryptoOperation,
    /// Operation attempted from an invalid state (session misuse).
    FailedPrecondition,
    /// Referenced entity is unknown (e.g. account not in the repository).
    NotFound,
    /// Entity already exists (e.g. address collision on import).
    AlreadyExists,
    /// External RPC, cache, or privacy manager unreachable.
    Connection,
    /// Method or protocol not implemented.
    FeatureNotSupported,
    /// Non-fatal condition; never aborts the chain.
    Warning,
    /// Unclassified internal failure.
    Internal,
}

impl ErrorKind {
    /// Returns true for the warning class, which does not count toward the
    /// abort threshold.
    #[must_use]
    pub fn is_warning(self) -> bool {
        matches!(self, ErrorKind::Warning)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Data => "data",
            ErrorKind::CryptoOperation => "crypto-operation",
            ErrorKind::FailedPrecondition => "failed-precondition",
            ErrorKind::NotFound => "not-found",
            ErrorKind::AlreadyExists => "already-exists",
            ErrorKind::Connection => "connection",
            ErrorKind::FeatureNotSupported => "feature-not-supported",
            ErrorKind::Warning => "warning",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// A structured error recorded on an envelope.
///
/// Carries the error class, a human-readable message, and the identifier of
/// the component that produced it.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("[{component}] {kind}: {message}")]
pub struct EnvelopeError {
    /// Error class.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Identifier of the producing component (e.g. "nonce-manager").
    pub component: String,
}

impl EnvelopeError {
    /// Creates a new structured error.
    pub fn new(kind: ErrorKind, message: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            component: component.into(),
        }
    }

    /// Creates a warning-class error.
    pub fn warning(message: impl Into<String>, component: impl Into<String>) -> Self {
        Self::new(ErrorKind::Warning, message, component)
    }

    /// Returns true when this error aborts a chain (anything but a warning).
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !self.kind.is_warning()
    }
}
