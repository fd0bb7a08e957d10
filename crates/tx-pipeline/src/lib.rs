//! # Transaction Pipeline
//!
//! Stage handlers for the orchestration chain, plus the outbound ports they
//! depend on. The standard stage order:
//!
//! ```text
//! craft -> gas estimate -> gas price -> nonce -> sign -> send
//! ```
//!
//! Each stage wraps upstream failures into the shared error taxonomy with a
//! component tag before recording them on the envelope; the sender stage is
//! terminal and never runs once a fatal error is present.

pub mod handlers;
pub mod pipeline;
pub mod ports;
pub mod retry;

pub use handlers::{
    CrafterHandler, GasEstimationHandler, GasPricingHandler, SenderHandler, SigningHandler,
};
pub use pipeline::standard_chain;
pub use ports::{ClientError, GasEstimator, GasPricer, PrivacyManagerClient, TransactionSender};
pub use retry::{RetryConfig, RetryingPrivacyClient};
