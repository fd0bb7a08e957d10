//! Outbound (driven) ports for the signing subsystem.

pub mod outbound;

pub use outbound::SecretStore;
