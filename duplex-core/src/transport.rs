//! # Transport Adapter
//!
//! The transport is the only part of a deployment that moves bytes. Duplex
//! treats it as an opaque async function from an [`Envelope`] to the remote
//! receiver's reply; encoding, retries, timeouts and connection management
//! are all the adapter's concern.
//!
//! A reply of `None` means the remote receiver had no route for the key and
//! dropped the message.

use crate::schema::Duplex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{borrow::Cow, future::Future, pin::Pin};

/// One outbound message: its key and its erased payload.
///
/// Envelopes serialize as `{"key": "...", "payload": ...}`; an absent payload
/// is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// The message key.
    pub key: Cow<'static, str>,
    /// The payload, absent for keys that take none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Envelope {
    /// Create an envelope.
    pub fn new(key: impl Into<Cow<'static, str>>, payload: Option<Value>) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }

    /// Create an envelope for message `D`.
    pub fn of<D: Duplex>(payload: Option<Value>) -> Self {
        Self::new(D::KEY, payload)
    }

    /// The message key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Delivers envelopes to a remote receiver.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a transport adapter",
    label = "missing `Transport` implementation",
    note = "Implement `deliver` to move an `Envelope` to the remote receiver and return its reply."
)]
pub trait Transport: Send + Sync {
    /// The adapter's own failure type. Senders return it unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Delivers one envelope and resolves to the remote reply.
    fn deliver(
        &self,
        envelope: Envelope,
    ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send;
}

/// Dynamic object-safe version of [`Transport`].
///
/// Use this trait when the adapter is chosen at runtime; a
/// `Box<dyn DynTransport<Error = E>>` is itself a [`Transport`].
pub trait DynTransport: Send + Sync {
    /// The adapter's own failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Delivers one envelope (dynamic dispatch version).
    fn deliver_dyn<'a>(
        &'a self,
        envelope: Envelope,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, Self::Error>> + Send + 'a>>;
}

// Blanket implementation: any Transport is a DynTransport.
impl<T: Transport> DynTransport for T {
    type Error = T::Error;

    fn deliver_dyn<'a>(
        &'a self,
        envelope: Envelope,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Value>, Self::Error>> + Send + 'a>> {
        Box::pin(self.deliver(envelope))
    }
}

// Allow Box<dyn DynTransport> to be used where Transport is expected.
impl<E> Transport for Box<dyn DynTransport<Error = E>>
where
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    async fn deliver(&self, envelope: Envelope) -> Result<Option<Value>, E> {
        // The box is itself a `DynTransport`; call through the inner object.
        (**self).deliver_dyn(envelope).await
    }
}
