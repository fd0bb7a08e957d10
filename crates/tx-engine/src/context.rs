//! Per-envelope execution state.
//!
//! A `ProcessingContext` is created once per envelope, owned by the task
//! processing it, and discarded after the chain completes.

use std::collections::HashMap;

use shared_types::{Envelope, EnvelopeError, ErrorKind};
use tracing::debug;

/// Per-envelope execution state: the envelope itself, a key/value scratch
/// bag for handler-to-handler hints, and the terminal flag.
#[derive(Debug)]
pub struct ProcessingContext {
    /// The envelope being processed. Handlers mutate it in place.
    pub envelope: Envelope,
    scratch: HashMap<String, String>,
    aborted: bool,
}

impl ProcessingContext {
    /// Creates a fresh context owning the given envelope.
    pub fn new(envelope: Envelope) -> Self {
        Self {
            envelope,
            scratch: HashMap::new(),
            aborted: false,
        }
    }

    /// Records a fatal error and marks the chain terminal: no handler after
    /// the current cursor will start. Handlers already on the call stack
    /// still regain control.
    pub fn abort(&mut self, error: EnvelopeError) {
        debug!(
            envelope_id = %self.envelope.id,
            kind = %error.kind,
            component = %error.component,
            "Aborting handler chain"
        );
        self.envelope.record_error(error);
        self.aborted = true;
    }

    /// Records a non-aborting, warning-class error. The chain continues.
    pub fn warn(&mut self, message: impl Into<String>, component: impl Into<String>) {
        self.envelope
            .record_error(EnvelopeError::warning(message, component));
    }

    /// Records a non-aborting error of an arbitrary class.
    ///
    /// Unlike [`abort`](Self::abort), the chain continues; the error still
    /// counts toward the fatal threshold unless it is a warning.
    pub fn record(&mut self, error: EnvelopeError) {
        self.envelope.record_error(error);
    }

    /// Convenience for recording-and-aborting in one call.
    pub fn abort_with(
        &mut self,
        kind: ErrorKind,
        message: impl Into<String>,
        component: impl Into<String>,
    ) {
        self.abort(EnvelopeError::new(kind, message, component));
    }

    /// Returns true once the chain has been aborted.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Stores a scratch value for downstream handlers.
    pub fn set_scratch(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.scratch.insert(key.into(), value.into());
    }

    /// Reads a scratch value left by an upstream handler.
    #[must_use]
    pub fn scratch(&self, key: &str) -> Option<&str> {
        self.scratch.get(key).map(String::as_str)
    }

    /// Consumes the context, returning the processed envelope.
    #[must_use]
    pub fn into_envelope(self) -> Envelope {
        self.envelope
    }
}
