//! Cross-crate integration flows.

pub mod nonce_sequencing;
pub mod pipeline_flow;
pub mod signing_protocols;
