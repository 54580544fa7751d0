//! Testing utilities for Duplex.
//!
//! This module provides utilities to make testing senders and receivers easier.
//!
//! # Features
//!
//! - [`RecordingTransport`]: A transport that records every envelope and
//!   answers with a programmable reply
//! - [`CountingHandler`]: A handler that counts invocations

use duplex_core::{BoxError, Duplex, Envelope, Handler, Transport};
use serde_json::Value;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use thiserror::Error;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Transport
// ============================================================================

/// Error produced by a [`RecordingTransport`] programmed with
/// [`RecordingTransport::set_error`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RecordedError(pub String);

/// A transport that records all envelopes it is asked to deliver.
///
/// Clones share the same recording, so a test can keep one handle while a
/// sender owns another.
///
/// # Example
///
/// ```rust,ignore
/// let transport = RecordingTransport::replying(json!(3));
/// let sender = Sender::<Calculator, _>::new(transport.clone());
///
/// assert_eq!(sender.send::<MathAdd>(AddRequest { a: 1, b: 2 }).await?, 3);
/// assert_eq!(transport.envelopes()[0].key, "math.add");
/// ```
#[derive(Clone)]
pub struct RecordingTransport {
    envelopes: Arc<Mutex<Vec<Envelope>>>,
    reply: Arc<Mutex<Result<Option<Value>, RecordedError>>>,
}

impl RecordingTransport {
    /// Create a recording transport that replies with `None`.
    pub fn new() -> Self {
        Self {
            envelopes: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(Mutex::new(Ok(None))),
        }
    }

    /// Create a recording transport that replies with `value`.
    pub fn replying(value: Value) -> Self {
        let transport = Self::new();
        transport.set_reply(Some(value));
        transport
    }

    /// Set the reply returned by subsequent deliveries.
    pub fn set_reply(&self, reply: Option<Value>) {
        *lock(&self.reply) = Ok(reply);
    }

    /// Make subsequent deliveries fail with `message`.
    pub fn set_error(&self, message: impl Into<String>) {
        *lock(&self.reply) = Err(RecordedError(message.into()));
    }

    /// Get a clone of the recorded envelopes.
    pub fn envelopes(&self) -> Vec<Envelope> {
        lock(&self.envelopes).clone()
    }

    /// Get the number of recorded envelopes.
    pub fn count(&self) -> usize {
        lock(&self.envelopes).len()
    }

    /// Clear all recorded envelopes.
    pub fn clear(&self) {
        lock(&self.envelopes).clear();
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RecordingTransport {
    type Error = RecordedError;

    async fn deliver(&self, envelope: Envelope) -> Result<Option<Value>, RecordedError> {
        lock(&self.envelopes).push(envelope);
        lock(&self.reply).clone()
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations and answers with `Default::default()`.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingHandler::new();
/// receiver.route::<Ping>()?.to_handler(counter.clone());
///
/// receiver.receive("ping", None).await?;
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<D, C> Handler<D, C> for CountingHandler
where
    D: Duplex,
    D::Response: Default,
    C: Send + 'static,
{
    async fn call(&self, _ctx: C, _request: D::Request) -> Result<D::Response, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(D::Response::default())
    }
}
