//! Handler trait, continuation, and combinators.
//!
//! Each handler receives the rest of the chain as a [`Next`] continuation and
//! may run logic before and after invoking it. Invoking the continuation is
//! synchronous within the same call stack (awaited in place), which is what
//! makes the wrap pattern possible: a handler that must act only after all
//! downstream handlers finished simply places its logic after `next.run()`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::ProcessingContext;

/// A single pipeline stage.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Processes the envelope in `ctx`, invoking `next` zero or one times to
    /// run the remainder of the chain.
    async fn handle(&self, ctx: &mut ProcessingContext, next: Next<'_>);
}

/// Continuation representing the not-yet-executed remainder of a chain.
///
/// Running it is a no-op once the context has been aborted, which is the
/// mechanism that prevents handlers after the aborting cursor from starting.
pub struct Next<'a> {
    rest: &'a [Arc<dyn Handler>],
}

impl<'a> Next<'a> {
    /// An empty continuation; running it does nothing. Used by fan-out
    /// combinators that must isolate their children from the outer chain.
    #[must_use]
    pub fn empty() -> Next<'static> {
        Next { rest: &[] }
    }

    /// Runs the remainder of the chain, head first.
    pub async fn run(self, ctx: &mut ProcessingContext) {
        if ctx.is_aborted() {
            return;
        }
        if let Some((head, rest)) = self.rest.split_first() {
            head.handle(ctx, Next { rest }).await;
        }
    }
}

/// An ordered, immutable handler chain.
#[derive(Clone, Default)]
pub struct Chain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl Chain {
    /// Builds a chain from an ordered handler list.
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self { handlers }
    }

    /// Number of top-level handlers in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true when the chain has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Processes one envelope context through the full chain.
    pub async fn process(&self, ctx: &mut ProcessingContext) {
        Next {
            rest: &self.handlers,
        }
        .run(ctx)
        .await;
    }
}

/// Fan-out combinator: runs several handlers unconditionally and
/// independently, each with an empty continuation, then resumes the outer
/// chain.
///
/// Children cannot see or invoke the outer continuation; an abort raised by
/// one child does not stop its siblings (it still marks the context terminal
/// for the handlers after the combinator).
pub struct CombineHandlers {
    children: Vec<Arc<dyn Handler>>,
}

impl CombineHandlers {
    /// Builds a fan-out over the given children.
    pub fn new(children: Vec<Arc<dyn Handler>>) -> Self {
        Self { children }
    }
}

#[async_trait]
impl Handler for CombineHandlers {
    async fn handle(&self, ctx: &mut ProcessingContext, next: Next<'_>) {
        for child in &self.children {
            child.handle(ctx, Next::empty()).await;
        }
        next.run(ctx).await;
    }
}
