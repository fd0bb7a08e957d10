//! # Nonce Sequencing Flows
//!
//! Gap-free sequencing checked through full chains rather than the handler
//! in isolation: consecutive assignment from the chain-reported pending
//! nonce, the recovery override, and commit suppression on downstream
//! failure.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use nonce_manager::{
        ChainStateReader, InMemoryNonceCache, NonceCache, NonceError, NonceHandler, NonceKey,
    };
    use shared_types::{Address, Envelope, EnvelopeError, ErrorKind, NONCE_RECOVERY_KEY};
    use tx_engine::{Chain, Handler, Next, ProcessingContext};

    const SENDER: Address = [0xAA; 20];
    const CHAIN_ID: u64 = 10;

    struct StubChainReader {
        pending: u64,
    }

    #[async_trait]
    impl ChainStateReader for StubChainReader {
        async fn pending_nonce_at(
            &self,
            _chain_id: u64,
            _address: &Address,
        ) -> Result<u64, NonceError> {
            Ok(self.pending)
        }
    }

    /// Tail stage standing in for sign + send; succeeds or aborts.
    struct Tail {
        fail: bool,
    }

    #[async_trait]
    impl Handler for Tail {
        async fn handle(&self, ctx: &mut ProcessingContext, next: Next<'_>) {
            if self.fail {
                ctx.abort(EnvelopeError::new(
                    ErrorKind::Connection,
                    "broadcast refused",
                    "sender",
                ));
                return;
            }
            next.run(ctx).await;
        }
    }

    fn sequencing_chain(
        cache: Arc<InMemoryNonceCache>,
        pending: u64,
        tail_fails: bool,
    ) -> Chain {
        Chain::new(vec![
            Arc::new(NonceHandler::new(
                cache,
                Arc::new(StubChainReader { pending }),
            )),
            Arc::new(Tail { fail: tail_fails }),
        ])
    }

    async fn run_one(chain: &Chain, envelope: Envelope) -> Envelope {
        let mut ctx = ProcessingContext::new(envelope);
        chain.process(&mut ctx).await;
        ctx.into_envelope()
    }

    #[tokio::test]
    async fn test_sequential_envelopes_get_consecutive_nonces() {
        let cache = Arc::new(InMemoryNonceCache::new());
        let chain = sequencing_chain(cache.clone(), 100, false);

        for expected in 100..110 {
            let envelope = run_one(&chain, Envelope::new(CHAIN_ID, SENDER)).await;
            assert_eq!(envelope.tx.nonce, Some(expected));
            assert!(!envelope.has_fatal_errors());
        }

        let key = NonceKey::new(CHAIN_ID, SENDER);
        assert_eq!(cache.get_last_attributed(&key).await.unwrap(), Some(109));
    }

    #[tokio::test]
    async fn test_keys_are_isolated_per_chain_and_sender() {
        let cache = Arc::new(InMemoryNonceCache::new());
        let chain_a = sequencing_chain(cache.clone(), 5, false);

        run_one(&chain_a, Envelope::new(1, SENDER)).await;
        run_one(&chain_a, Envelope::new(2, SENDER)).await;
        let other = run_one(&chain_a, Envelope::new(1, [0xBB; 20])).await;

        // Each (chain, sender) pair starts from its own pending nonce.
        assert_eq!(other.tx.nonce, Some(5));
        assert_eq!(
            cache
                .get_last_attributed(&NonceKey::new(1, SENDER))
                .await
                .unwrap(),
            Some(5)
        );
        assert_eq!(
            cache
                .get_last_attributed(&NonceKey::new(2, SENDER))
                .await
                .unwrap(),
            Some(5)
        );
    }

    #[tokio::test]
    async fn test_recovery_signal_overrides_and_clears() {
        let cache = Arc::new(InMemoryNonceCache::new());
        let key = NonceKey::new(CHAIN_ID, SENDER);
        cache.set_last_attributed(&key, 500).await.unwrap();

        let chain = sequencing_chain(cache.clone(), 0, false);
        let envelope = Envelope::new(CHAIN_ID, SENDER).with_metadata(NONCE_RECOVERY_KEY, "17");
        let processed = run_one(&chain, envelope).await;

        assert_eq!(processed.tx.nonce, Some(17));
        assert!(!processed.metadata.contains_key(NONCE_RECOVERY_KEY));
        // The override rebases subsequent sequencing.
        assert_eq!(cache.get_last_attributed(&key).await.unwrap(), Some(17));

        let next = run_one(&chain, Envelope::new(CHAIN_ID, SENDER)).await;
        assert_eq!(next.tx.nonce, Some(18));
    }

    #[tokio::test]
    async fn test_downstream_abort_leaves_cache_untouched() {
        let cache = Arc::new(InMemoryNonceCache::new());
        let failing = sequencing_chain(cache.clone(), 30, true);

        let processed = run_one(&failing, Envelope::new(CHAIN_ID, SENDER)).await;
        assert_eq!(processed.tx.nonce, Some(30));
        assert!(processed.has_fatal_errors());

        let key = NonceKey::new(CHAIN_ID, SENDER);
        assert_eq!(cache.get_last_attributed(&key).await.unwrap(), None);

        // The slot is reissued once the tail recovers.
        let healthy = sequencing_chain(cache.clone(), 30, false);
        let retried = run_one(&healthy, Envelope::new(CHAIN_ID, SENDER)).await;
        assert_eq!(retried.tx.nonce, Some(30));
        assert_eq!(cache.get_last_attributed(&key).await.unwrap(), Some(30));
    }
}
