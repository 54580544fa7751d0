//! Tokio channel transport.
//!
//! [`channel`] splits into a [`ChannelTransport`] for the sending side and an
//! [`Inbox`] for the receiving side. Each delivery travels through a bounded
//! `mpsc` queue together with a `oneshot` reply slot.
//!
//! ```rust,ignore
//! let (transport, inbox) = channel(64);
//! tokio::spawn(inbox.serve(Arc::new(receiver)));
//!
//! let sender = Sender::<Calculator, _>::new(transport);
//! let sum = sender.send::<MathAdd>(AddRequest { a: 1, b: 2 }).await?;
//! ```

use crate::receiver::Receiver;
use duplex_core::{DispatchError, Envelope, Schema, Transport};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

type Reply = Result<Option<Value>, DispatchError>;

struct Call {
    envelope: Envelope,
    reply: oneshot::Sender<Reply>,
}

/// Errors returned by [`ChannelTransport`].
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The inbox was dropped; nothing is serving this channel.
    #[error("inbox has been closed")]
    Closed,

    /// The serving side dropped the reply slot without answering.
    #[error("reply was dropped before completion")]
    Dropped,

    /// The remote receiver failed to dispatch the message.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Create a channel transport with room for `buffer` queued deliveries.
///
/// # Panics
///
/// Panics if `buffer` is zero.
pub fn channel(buffer: usize) -> (ChannelTransport, Inbox) {
    let (calls, inbox) = mpsc::channel(buffer);
    (ChannelTransport { calls }, Inbox { calls: inbox })
}

/// Sending half of a [`channel`]. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ChannelTransport {
    calls: mpsc::Sender<Call>,
}

impl ChannelTransport {
    /// Returns true once the inbox has been dropped.
    pub fn is_closed(&self) -> bool {
        self.calls.is_closed()
    }
}

impl Transport for ChannelTransport {
    type Error = ChannelError;

    async fn deliver(&self, envelope: Envelope) -> Result<Option<Value>, ChannelError> {
        let (reply, response) = oneshot::channel();
        self.calls
            .send(Call { envelope, reply })
            .await
            .map_err(|_| ChannelError::Closed)?;

        let reply = response.await.map_err(|_| ChannelError::Dropped)?;
        Ok(reply?)
    }
}

/// Receiving half of a [`channel`].
#[derive(Debug)]
pub struct Inbox {
    calls: mpsc::Receiver<Call>,
}

impl Inbox {
    /// Serve deliveries with a receiver that takes no context.
    ///
    /// See [`Inbox::serve_with`].
    pub async fn serve<S: Schema>(self, receiver: Arc<Receiver<S>>) {
        self.serve_with(receiver, ()).await
    }

    /// Serve deliveries until every [`ChannelTransport`] is dropped.
    ///
    /// Each delivery is dispatched on its own task with a clone of `context`,
    /// so slow handlers do not hold up the queue and replies may complete out
    /// of order. Must be called within a tokio runtime.
    pub async fn serve_with<S, C>(mut self, receiver: Arc<Receiver<S, C>>, context: C)
    where
        S: Schema,
        C: Clone + Send + Sync + 'static,
    {
        while let Some(Call { envelope, reply }) = self.calls.recv().await {
            let receiver = Arc::clone(&receiver);
            let context = context.clone();
            tokio::spawn(async move {
                let Envelope { key, payload } = envelope;
                let result = receiver.receive_with(context, &key, payload).await;
                // The caller may have given up waiting.
                let _ = reply.send(result);
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(schema = S::NAME, "inbox closed, all transports dropped");
    }
}

impl std::fmt::Debug for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("envelope", &self.envelope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closed_inbox() {
        let (transport, inbox) = channel(1);
        drop(inbox);

        assert!(transport.is_closed());
        let err = transport.deliver(Envelope::new("any", None)).await.unwrap_err();
        assert!(matches!(err, ChannelError::Closed));
    }

    #[tokio::test]
    async fn test_dropped_reply() {
        let (transport, mut inbox) = channel(1);
        let server = tokio::spawn(async move {
            // Take the call and drop its reply slot unanswered.
            let call = inbox.calls.recv().await;
            drop(call);
        });

        let err = transport.deliver(Envelope::new("any", None)).await.unwrap_err();
        assert!(matches!(err, ChannelError::Dropped));
        server.await.unwrap();
    }
}
