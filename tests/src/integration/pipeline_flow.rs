//! # End-to-End Pipeline Flows
//!
//! The full six-stage chain run through the engine with stub external
//! collaborators: clean submissions, abort propagation across stages, and
//! mixed-protocol batches.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use primitive_types::U256;

    use nonce_manager::{ChainStateReader, InMemoryNonceCache, NonceCache, NonceError, NonceKey};
    use shared_types::{Address, Envelope, ErrorKind, Hash, Protocol, TxData};
    use tx_engine::{Chain, Engine, Handler, Next, ProcessingContext};
    use tx_pipeline::{standard_chain, ClientError, GasEstimator, GasPricer, TransactionSender};
    use tx_signer::{AccountManager, InMemorySecretStore, ProtocolDispatcher};

    const CHAIN_ID: u64 = 10;

    // =============================================================================
    // STUB COLLABORATORS
    // =============================================================================

    struct StubEstimator {
        fail: bool,
    }

    #[async_trait]
    impl GasEstimator for StubEstimator {
        async fn estimate_gas(
            &self,
            _chain_id: u64,
            _from: &Address,
            _tx: &TxData,
        ) -> Result<u64, ClientError> {
            if self.fail {
                return Err(ClientError::Permanent("execution reverted".into()));
            }
            Ok(53_000)
        }
    }

    struct StubPricer;

    #[async_trait]
    impl GasPricer for StubPricer {
        async fn gas_price(&self, _chain_id: u64) -> Result<U256, ClientError> {
            Ok(U256::from(3_000_000_000u64))
        }
    }

    struct StubChainReader;

    #[async_trait]
    impl ChainStateReader for StubChainReader {
        async fn pending_nonce_at(
            &self,
            _chain_id: u64,
            _address: &Address,
        ) -> Result<u64, NonceError> {
            Ok(0)
        }
    }

    struct RecordingSender {
        sent: Mutex<Vec<Vec<u8>>>,
    }

    impl RecordingSender {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TransactionSender for RecordingSender {
        async fn send_raw(&self, _chain_id: u64, raw: &[u8]) -> Result<Hash, ClientError> {
            self.sent.lock().push(raw.to_vec());
            Ok([0x33; 32])
        }
    }

    struct Fixture {
        chain: Arc<Chain>,
        cache: Arc<InMemoryNonceCache>,
        sender: Arc<RecordingSender>,
        from: Address,
    }

    async fn fixture(estimator_fails: bool) -> Fixture {
        let manager = Arc::new(AccountManager::new(InMemorySecretStore::new()));
        let from = manager.generate_account().await.unwrap();
        let dispatcher = Arc::new(ProtocolDispatcher::standard(manager));
        let cache = Arc::new(InMemoryNonceCache::new());
        let sender = Arc::new(RecordingSender::new());

        let chain = Arc::new(standard_chain(
            Arc::new(StubEstimator {
                fail: estimator_fails,
            }),
            Arc::new(StubPricer),
            cache.clone(),
            Arc::new(StubChainReader),
            dispatcher,
            sender.clone(),
        ));
        Fixture {
            chain,
            cache,
            sender,
            from,
        }
    }

    fn transfer(from: Address) -> Envelope {
        let mut envelope = Envelope::new(CHAIN_ID, from);
        envelope.tx.to = Some([0xBB; 20]);
        envelope.tx.value = U256::from(1u64);
        envelope
    }

    // =============================================================================
    // END-TO-END FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_clean_envelope_is_crafted_signed_and_broadcast() {
        let fixture = fixture(false).await;

        let processed = Engine::new()
            .run(fixture.chain.clone(), vec![transfer(fixture.from)])
            .await;

        assert_eq!(processed.len(), 1);
        let envelope = &processed[0];
        assert!(envelope.errors.is_empty(), "{:?}", envelope.errors);
        assert_eq!(envelope.tx.nonce, Some(0));
        assert_eq!(envelope.tx.gas, Some(53_000));
        assert_eq!(envelope.tx.gas_price, Some(U256::from(3_000_000_000u64)));
        assert!(envelope.raw.is_some());
        assert!(envelope.hash.is_some());
        assert_eq!(fixture.sender.sent.lock().len(), 1);

        let key = NonceKey::new(CHAIN_ID, fixture.from);
        assert_eq!(
            fixture.cache.get_last_attributed(&key).await.unwrap(),
            Some(0)
        );
    }

    #[tokio::test]
    async fn test_estimation_failure_stops_the_chain_before_signing() {
        let fixture = fixture(true).await;

        let processed = Engine::new()
            .run(fixture.chain.clone(), vec![transfer(fixture.from)])
            .await;

        let envelope = &processed[0];
        assert!(envelope.has_fatal_errors());
        assert_eq!(envelope.errors[0].kind, ErrorKind::Data);
        assert_eq!(envelope.errors[0].component, "gas-estimator");
        // Later stages never ran.
        assert_eq!(envelope.tx.nonce, None);
        assert!(envelope.raw.is_none());
        assert!(fixture.sender.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_constellation_envelope_flows_through_without_broadcast() {
        let fixture = fixture(false).await;

        let envelope = transfer(fixture.from).with_protocol(Protocol::Constellation);
        let processed = Engine::new()
            .run(fixture.chain.clone(), vec![envelope])
            .await;

        let envelope = &processed[0];
        assert!(envelope.errors.is_empty(), "{:?}", envelope.errors);
        assert!(envelope.raw.is_none());
        assert!(fixture.sender.sent.lock().is_empty());

        // A clean no-op run still commits the nonce attribution.
        let key = NonceKey::new(CHAIN_ID, fixture.from);
        assert_eq!(
            fixture.cache.get_last_attributed(&key).await.unwrap(),
            Some(0)
        );
    }

    #[tokio::test]
    async fn test_engine_processes_batch_of_independent_senders() {
        let manager = Arc::new(AccountManager::new(InMemorySecretStore::new()));
        let mut envelopes = Vec::new();
        for _ in 0..8 {
            let from = manager.generate_account().await.unwrap();
            envelopes.push(transfer(from));
        }
        let dispatcher = Arc::new(ProtocolDispatcher::standard(manager));
        let sender = Arc::new(RecordingSender::new());
        let chain = Arc::new(standard_chain(
            Arc::new(StubEstimator { fail: false }),
            Arc::new(StubPricer),
            Arc::new(InMemoryNonceCache::new()),
            Arc::new(StubChainReader),
            dispatcher,
            sender.clone(),
        ));

        let processed = Engine::new().run(chain, envelopes).await;

        assert_eq!(processed.len(), 8);
        assert!(processed.iter().all(|e| e.errors.is_empty()));
        assert!(processed.iter().all(|e| e.raw.is_some()));
        assert_eq!(sender.sent.lock().len(), 8);
    }

    // =============================================================================
    // ABORT SEMANTICS ACROSS STAGES
    // =============================================================================

    /// Records its label around the continuation, optionally aborting.
    struct Probe {
        label: &'static str,
        abort: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Handler for Probe {
        async fn handle(&self, ctx: &mut ProcessingContext, next: Next<'_>) {
            self.log.lock().push(format!("{}:enter", self.label));
            if self.abort {
                ctx.abort_with(ErrorKind::Internal, "probe abort", self.label);
            }
            next.run(ctx).await;
            self.log.lock().push(format!("{}:exit", self.label));
        }
    }

    #[tokio::test]
    async fn test_abort_at_stage_k_skips_later_stages_only() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let probe = |label, abort| -> Arc<dyn Handler> {
            Arc::new(Probe {
                label,
                abort,
                log: log.clone(),
            })
        };
        let chain = Arc::new(Chain::new(vec![
            probe("stage0", false),
            probe("stage1", false),
            probe("stage2", true),
            probe("stage3", false),
            probe("stage4", false),
        ]));

        let processed = Engine::new()
            .run(chain, vec![Envelope::new(CHAIN_ID, [0x01; 20])])
            .await;

        assert!(processed[0].has_fatal_errors());
        // Stages after the aborting one never start; every stage at or
        // before it completes its post-continuation code.
        assert_eq!(
            *log.lock(),
            vec![
                "stage0:enter",
                "stage1:enter",
                "stage2:enter",
                "stage2:exit",
                "stage1:exit",
                "stage0:exit",
            ]
        );
    }
}
