//! Outer layer: secret store adapters.

pub mod memory;

pub use memory::InMemorySecretStore;
