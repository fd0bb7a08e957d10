//! # Protocol Descriptor
//!
//! Tagged union identifying the wire protocol an envelope must be signed
//! under. Dispatch happens through a lookup table keyed by this tag; adding a
//! protocol means registering a table entry, not editing a switch.

use serde::{Deserialize, Serialize};

/// The wire protocol declared on an envelope.
///
/// An envelope with no declared protocol defaults to public Ethereum at
/// dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Public EIP-155 Ethereum transaction.
    Ethereum,
    /// EEA privacy-group private transaction.
    Eea,
    /// Tessera-style private transaction (pre-EIP-155 signing, private V).
    Tessera,
    /// Constellation private transaction; privacy is enforced at the node,
    /// so signing is deliberately a no-op.
    Constellation,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Protocol::Ethereum => "ethereum",
            Protocol::Eea => "eea",
            Protocol::Tessera => "tessera",
            Protocol::Constellation => "constellation",
        };
        f.write_str(name)
    }
}
