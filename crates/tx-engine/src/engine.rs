//! Concurrent chain executor.
//!
//! Spawns one tokio task per envelope and runs the full handler chain inside
//! it. Nothing is shared across tasks except whatever internally-synchronized
//! resources individual handlers reach for.

use std::sync::Arc;
use std::time::Duration;

use shared_types::{Envelope, ErrorKind};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::context::ProcessingContext;
use crate::handler::Chain;

/// Engine tuning knobs.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Optional wall-clock budget per envelope. When exceeded, the envelope
    /// is aborted with a connection-class error. `None` delegates deadlines
    /// entirely to the caller.
    pub envelope_timeout: Option<Duration>,
}

/// Generic sequential handler-chain executor.
///
/// Constructed explicitly and passed to call sites; holds no global state.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Runs every envelope through the chain, one task per envelope.
    ///
    /// Returns the processed envelopes in completion order; cross-envelope
    /// ordering must be imposed upstream when required (e.g. per-sender
    /// partitioning for nonce correctness).
    pub async fn run(&self, chain: Arc<Chain>, envelopes: Vec<Envelope>) -> Vec<Envelope> {
        let total = envelopes.len();
        info!(envelopes = total, handlers = chain.len(), "Engine run starting");

        let mut tasks: JoinSet<Envelope> = JoinSet::new();
        for envelope in envelopes {
            let chain = Arc::clone(&chain);
            let timeout = self.config.envelope_timeout;
            tasks.spawn(async move {
                let mut ctx = ProcessingContext::new(envelope);
                match timeout {
                    Some(budget) => {
                        if tokio::time::timeout(budget, chain.process(&mut ctx))
                            .await
                            .is_err()
                        {
                            ctx.abort_with(
                                ErrorKind::Connection,
                                format!("envelope processing exceeded {budget:?}"),
                                "engine",
                            );
                        }
                    }
                    None => chain.process(&mut ctx).await,
                }
                debug!(
                    envelope_id = %ctx.envelope.id,
                    errors = ctx.envelope.errors.len(),
                    aborted = ctx.is_aborted(),
                    "Envelope chain complete"
                );
                ctx.into_envelope()
            });
        }

        let mut processed = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(envelope) => processed.push(envelope),
                // A panicking handler loses its envelope; surface loudly.
                Err(join_error) => error!(%join_error, "Envelope task failed"),
            }
        }

        info!(processed = processed.len(), "Engine run finished");
        processed
    }
}
