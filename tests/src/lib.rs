//! # Transaction Orchestrator Test Suite
//!
//! Unified test crate containing cross-crate integration tests.
//!
//! ## Structure
//!
//! ```text
//! tests/src/integration/
//! ├── signing_protocols.rs   # Protocol routing and signature properties
//! ├── nonce_sequencing.rs    # Gap-free sequencing across full chains
//! └── pipeline_flow.rs       # End-to-end chains through the engine
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p txo-tests
//!
//! # By flow
//! cargo test -p txo-tests integration::signing_protocols
//! cargo test -p txo-tests integration::nonce_sequencing
//! cargo test -p txo-tests integration::pipeline_flow
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
