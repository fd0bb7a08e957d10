//! # Shared Types Crate
//!
//! This crate contains the transaction envelope, privacy arguments, protocol
//! descriptor, and the error taxonomy shared across the pipeline subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Envelope Integrity**: The `Envelope` is the sole record flowing through
//!   the handler chain; handlers mutate it in place and accumulate structured
//!   errors on it.
//! - **No Exceptions Across Boundaries**: Every fallible operation surfaces as
//!   an explicit error value recorded on the envelope.

pub mod entities;
pub mod envelope;
pub mod errors;
pub mod protocol;

pub use entities::*;
pub use envelope::{Envelope, NONCE_RECOVERY_KEY};
pub use errors::*;
pub use protocol::Protocol;
