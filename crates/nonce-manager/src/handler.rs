//! Nonce assignment handler.
//!
//! Wrap-pattern stage: assigns the nonce before running the continuation and
//! commits the attribution afterwards, only when the rest of the chain
//! produced zero non-warning errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use tx_engine::{Handler, Next, ProcessingContext};

use shared_types::ErrorKind;

use crate::ports::{ChainStateReader, NonceCache, NonceKey};

/// Identifier tagged on errors produced by this handler.
const COMPONENT: &str = "nonce-manager";

/// Pipeline stage assigning the sender's next nonce.
pub struct NonceHandler {
    cache: Arc<dyn NonceCache>,
    chain: Arc<dyn ChainStateReader>,
}

impl NonceHandler {
    /// Creates a handler over the given cache and chain reader.
    pub fn new(cache: Arc<dyn NonceCache>, chain: Arc<dyn ChainStateReader>) -> Self {
        Self { cache, chain }
    }

    /// Resolves the nonce to assign, consulting the recovery signal, the
    /// cache, and finally the chain. Returns `(nonce, recovered)`.
    async fn resolve(&self, ctx: &mut ProcessingContext) -> Result<(u64, bool), ()> {
        // Explicit operator override: use verbatim, skip the cache. The
        // signal was already cleared by take_nonce_recovery.
        if let Some(expected) = ctx.envelope.take_nonce_recovery() {
            debug!(
                envelope_id = %ctx.envelope.id,
                nonce = expected,
                "Using recovery-signalled nonce"
            );
            return Ok((expected, true));
        }

        let key = NonceKey::new(ctx.envelope.chain_id, ctx.envelope.from);
        match self.cache.get_last_attributed(&key).await {
            Ok(Some(last)) => Ok((last + 1, false)),
            Ok(None) => {
                // First attribution for this key: the chain's pending nonce
                // already names the next free slot.
                match self
                    .chain
                    .pending_nonce_at(key.chain_id, &key.address)
                    .await
                {
                    Ok(pending) => {
                        debug!(key = %key, pending, "Nonce cache miss, using chain pending nonce");
                        Ok((pending, false))
                    }
                    Err(err) => {
                        ctx.abort_with(ErrorKind::Connection, err.to_string(), COMPONENT);
                        Err(())
                    }
                }
            }
            Err(err) => {
                ctx.abort_with(ErrorKind::Connection, err.to_string(), COMPONENT);
                Err(())
            }
        }
    }
}

#[async_trait]
impl Handler for NonceHandler {
    async fn handle(&self, ctx: &mut ProcessingContext, next: Next<'_>) {
        let Ok((nonce, recovered)) = self.resolve(ctx).await else {
            return;
        };

        ctx.envelope.tx.nonce = Some(nonce);
        let key = NonceKey::new(ctx.envelope.chain_id, ctx.envelope.from);

        next.run(ctx).await;

        // Commit only when the continuation stayed clean; an aborted send
        // must not burn the slot.
        if ctx.envelope.has_fatal_errors() {
            debug!(key = %key, nonce, "Skipping nonce attribution, downstream errors present");
            return;
        }

        if let Err(err) = self.cache.set_last_attributed(&key, nonce).await {
            // The transaction may already be sent; retrying here cannot be
            // made atomic with the send, so the drift is logged and accepted.
            warn!(key = %key, nonce, %err, "Nonce attribution commit failed after send");
            ctx.warn(
                format!("nonce attribution commit failed: {err}"),
                COMPONENT,
            );
        } else if recovered {
            debug!(key = %key, nonce, "Recovery nonce committed as new attribution base");
        }
    }
}
