//! # Nonce Manager
//!
//! Hands out gap-free, strictly increasing nonces per (chain, sender) key,
//! backed by a long-lived attribution cache with a chain-query fallback and
//! an explicit recovery override.
//!
//! ## Algorithm (per envelope)
//!
//! | Step | Source | Value used |
//! |------|--------|------------|
//! | Recovery signal present | envelope metadata | signalled value, verbatim |
//! | Cache hit | `NonceCache` | last attributed + 1 |
//! | Cache miss | `ChainStateReader` | pending nonce, unmodified |
//!
//! The attribution is committed back to the cache only when the continuation
//! produced zero non-warning errors, so an aborted send never burns a slot.
//!
//! ## Ordering Contract
//!
//! The sequencer is correct only when the caller guarantees at-most-one
//! in-flight assignment per (chain, sender) key (per-key locking or
//! single-consumer partitioning upstream); it does not serialize concurrent
//! calls for the same key itself.

pub mod handler;
pub mod memory;
pub mod ports;

pub use handler::NonceHandler;
pub use memory::InMemoryNonceCache;
pub use ports::{ChainStateReader, NonceCache, NonceError, NonceKey};
