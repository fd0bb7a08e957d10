//! Inner layer: accounts, wire encodings, and the signing session.

pub mod account;
pub mod encoding;
pub mod errors;
pub mod scheme;
pub mod session;
