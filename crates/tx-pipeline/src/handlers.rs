//! Stage handlers.
//!
//! Every stage follows the same discipline: already-populated fields are
//! respected (callers may pre-fill gas or price), upstream failures are
//! wrapped into the shared taxonomy with the stage's component tag, and
//! fatal failures abort the chain.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use tx_engine::{Handler, Next, ProcessingContext};

use shared_types::{address_to_hex, ErrorKind};
use tx_signer::ProtocolDispatcher;

use crate::ports::{GasEstimator, GasPricer, TransactionSender};

// =============================================================================
// PAYLOAD CRAFTER
// =============================================================================

/// First stage: rejects envelopes that no later stage could process.
pub struct CrafterHandler;

#[async_trait]
impl Handler for CrafterHandler {
    async fn handle(&self, ctx: &mut ProcessingContext, next: Next<'_>) {
        if ctx.envelope.chain_id == 0 {
            ctx.abort_with(
                ErrorKind::FailedPrecondition,
                "chain id must be non-zero",
                "crafter",
            );
            return;
        }
        if ctx.envelope.from == [0u8; 20] {
            ctx.abort_with(ErrorKind::Data, "sender address missing", "crafter");
            return;
        }
        // A transaction with neither a recipient nor code deploys nothing
        // and pays nobody.
        if ctx.envelope.tx.to.is_none() && ctx.envelope.tx.data.is_empty() {
            ctx.abort_with(
                ErrorKind::Data,
                "transaction has no recipient and no payload",
                "crafter",
            );
            return;
        }
        next.run(ctx).await;
    }
}

// =============================================================================
// GAS STAGES
// =============================================================================

/// Fills the gas limit from the estimator unless the caller pinned one.
pub struct GasEstimationHandler {
    estimator: Arc<dyn GasEstimator>,
}

impl GasEstimationHandler {
    pub fn new(estimator: Arc<dyn GasEstimator>) -> Self {
        Self { estimator }
    }
}

#[async_trait]
impl Handler for GasEstimationHandler {
    async fn handle(&self, ctx: &mut ProcessingContext, next: Next<'_>) {
        if ctx.envelope.tx.gas.is_none() {
            let estimate = self
                .estimator
                .estimate_gas(ctx.envelope.chain_id, &ctx.envelope.from, &ctx.envelope.tx)
                .await;
            match estimate {
                Ok(gas) => {
                    debug!(envelope_id = %ctx.envelope.id, gas, "Gas limit estimated");
                    ctx.envelope.tx.gas = Some(gas);
                }
                Err(err) => {
                    ctx.abort_with(err.kind(), err.to_string(), "gas-estimator");
                    return;
                }
            }
        }
        next.run(ctx).await;
    }
}

/// Fills the gas price from the pricer unless the caller pinned one.
pub struct GasPricingHandler {
    pricer: Arc<dyn GasPricer>,
}

impl GasPricingHandler {
    pub fn new(pricer: Arc<dyn GasPricer>) -> Self {
        Self { pricer }
    }
}

#[async_trait]
impl Handler for GasPricingHandler {
    async fn handle(&self, ctx: &mut ProcessingContext, next: Next<'_>) {
        if ctx.envelope.tx.gas_price.is_none() {
            match self.pricer.gas_price(ctx.envelope.chain_id).await {
                Ok(price) => {
                    debug!(envelope_id = %ctx.envelope.id, price = %price, "Gas price quoted");
                    ctx.envelope.tx.gas_price = Some(price);
                }
                Err(err) => {
                    ctx.abort_with(err.kind(), err.to_string(), "gas-pricer");
                    return;
                }
            }
        }
        next.run(ctx).await;
    }
}

// =============================================================================
// SIGNING
// =============================================================================

/// Routes the envelope through the protocol dispatcher.
pub struct SigningHandler {
    dispatcher: Arc<ProtocolDispatcher>,
}

impl SigningHandler {
    pub fn new(dispatcher: Arc<ProtocolDispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl Handler for SigningHandler {
    async fn handle(&self, ctx: &mut ProcessingContext, next: Next<'_>) {
        if let Err(err) = self.dispatcher.sign_envelope(&mut ctx.envelope).await {
            ctx.abort(err.into_envelope_error("tx-signer"));
            return;
        }
        next.run(ctx).await;
    }
}

// =============================================================================
// SENDER
// =============================================================================

/// Terminal stage: broadcasts the signed payload.
///
/// Never publishes an envelope carrying a fatal error, and treats a missing
/// raw payload as "nothing to broadcast" rather than a failure (the
/// Constellation route signs at the node, not here).
pub struct SenderHandler {
    sender: Arc<dyn TransactionSender>,
}

impl SenderHandler {
    pub fn new(sender: Arc<dyn TransactionSender>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Handler for SenderHandler {
    async fn handle(&self, ctx: &mut ProcessingContext, next: Next<'_>) {
        if ctx.envelope.has_fatal_errors() {
            debug!(envelope_id = %ctx.envelope.id, "Skipping broadcast, fatal errors present");
            return;
        }
        let Some(raw) = ctx.envelope.raw.clone() else {
            debug!(envelope_id = %ctx.envelope.id, "No raw payload, nothing to broadcast");
            next.run(ctx).await;
            return;
        };

        match self.sender.send_raw(ctx.envelope.chain_id, &raw).await {
            Ok(acked) => {
                info!(
                    envelope_id = %ctx.envelope.id,
                    chain_id = ctx.envelope.chain_id,
                    from = %address_to_hex(&ctx.envelope.from),
                    hash = ?acked,
                    "Transaction broadcast"
                );
            }
            Err(err) => {
                ctx.abort_with(err.kind(), err.to_string(), "sender");
                return;
            }
        }
        next.run(ctx).await;
    }
}
