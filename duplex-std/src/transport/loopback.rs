//! In-process transport that delivers straight into a receiver.

use crate::receiver::Receiver;
use duplex_core::{DispatchError, Envelope, Schema, Transport};
use serde_json::Value;
use std::sync::Arc;

/// Delivers every envelope to a local [`Receiver`].
///
/// The receiver's reply (including `None` for a dropped, unroutable message)
/// is handed back to the sender unchanged. For receivers with a context, the
/// context given at construction is cloned into every dispatch.
pub struct Loopback<S, C = ()> {
    receiver: Arc<Receiver<S, C>>,
    context: C,
}

impl<S: Schema> Loopback<S, ()> {
    /// Create a loopback to a receiver without context.
    pub fn new(receiver: Arc<Receiver<S>>) -> Self {
        Self {
            receiver,
            context: (),
        }
    }
}

impl<S, C> Loopback<S, C>
where
    S: Schema,
    C: Clone + Send + Sync + 'static,
{
    /// Create a loopback that hands `context` to every handler.
    pub fn with_context(receiver: Arc<Receiver<S, C>>, context: C) -> Self {
        Self { receiver, context }
    }

    /// The receiver behind this loopback.
    pub fn receiver(&self) -> &Arc<Receiver<S, C>> {
        &self.receiver
    }
}

impl<S, C: Clone> Clone for Loopback<S, C> {
    fn clone(&self) -> Self {
        Self {
            receiver: Arc::clone(&self.receiver),
            context: self.context.clone(),
        }
    }
}

impl<S, C> Transport for Loopback<S, C>
where
    S: Schema,
    C: Clone + Send + Sync + 'static,
{
    type Error = DispatchError;

    async fn deliver(&self, envelope: Envelope) -> Result<Option<Value>, DispatchError> {
        let Envelope { key, payload } = envelope;
        self.receiver
            .receive_with(self.context.clone(), &key, payload)
            .await
    }
}
