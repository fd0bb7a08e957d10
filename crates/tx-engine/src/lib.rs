//! # Handler-Chain Execution Engine
//!
//! Generic sequential executor composing independently-authored processing
//! stages over many concurrently in-flight envelopes.
//!
//! ## Execution Model
//!
//! - One tokio task per envelope; no context sharing across tasks. Any shared
//!   resource reached from a handler must be internally synchronized.
//! - Strictly sequential within one envelope's chain. A handler receives a
//!   [`Next`] continuation representing the rest of the chain and decides if
//!   and when to invoke it, so it can run logic both before and after all
//!   downstream handlers (wrap pattern).
//! - `abort` prevents handlers after the current cursor from starting but
//!   does not unwind handlers already active on the call stack; they regain
//!   control for cleanup and logging.
//!
//! ## Chain Semantics
//!
//! ```text
//! [handler 0] ──next──→ [handler 1] ──next──→ [handler 2]
//!      │                     │
//!      │                     └── abort(err) ──→ handler 2 never starts,
//!      │                                        handler 0 resumes after next
//!      └── post-next code always runs
//! ```

pub mod context;
pub mod engine;
pub mod handler;

pub use context::ProcessingContext;
pub use engine::{Engine, EngineConfig};
pub use handler::{Chain, CombineHandlers, Handler, Next};
