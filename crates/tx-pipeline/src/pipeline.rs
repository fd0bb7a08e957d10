//! Standard chain assembly.
//!
//! Stage order matters: the nonce stage wraps signing and broadcast so its
//! post-continuation commit observes their outcome, and signing must see the
//! fully crafted transaction (gas and price included).

use std::sync::Arc;

use nonce_manager::{ChainStateReader, NonceCache, NonceHandler};
use tx_engine::Chain;
use tx_signer::ProtocolDispatcher;

use crate::handlers::{
    CrafterHandler, GasEstimationHandler, GasPricingHandler, SenderHandler, SigningHandler,
};
use crate::ports::{GasEstimator, GasPricer, TransactionSender};

/// Builds the standard six-stage chain:
/// craft, gas estimate, gas price, nonce, sign, send.
pub fn standard_chain(
    estimator: Arc<dyn GasEstimator>,
    pricer: Arc<dyn GasPricer>,
    nonce_cache: Arc<dyn NonceCache>,
    chain_reader: Arc<dyn ChainStateReader>,
    dispatcher: Arc<ProtocolDispatcher>,
    sender: Arc<dyn TransactionSender>,
) -> Chain {
    Chain::new(vec![
        Arc::new(CrafterHandler),
        Arc::new(GasEstimationHandler::new(estimator)),
        Arc::new(GasPricingHandler::new(pricer)),
        Arc::new(NonceHandler::new(nonce_cache, chain_reader)),
        Arc::new(SigningHandler::new(dispatcher)),
        Arc::new(SenderHandler::new(sender)),
    ])
}
