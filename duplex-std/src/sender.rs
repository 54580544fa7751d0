//! # Sender
//!
//! A thin, typed call wrapper over a [`Transport`]. The sender maps a message
//! type to exactly its request and response types and forwards one
//! [`Envelope`] per call. It never retries, never times out and never inspects
//! payloads beyond the encode/decode step.
//!
//! # Calling Convention
//!
//! - [`Unary`] messages take exactly one argument: [`Sender::send`].
//! - [`Nullary`] messages take none: [`Sender::send_empty`]. Supplying a
//!   payload cannot be expressed.
//!
//! Calls that arrive through an untyped path (e.g. decoded from an external
//! request) use [`Sender::send_raw`], which applies the same convention at
//! runtime against the schema's descriptors.

use duplex_core::{Envelope, Member, Nullary, Schema, SendError, Transport, Unary, codec};
use serde_json::Value;
use std::{fmt, marker::PhantomData};

/// Typed call wrapper for the messages of schema `S`.
pub struct Sender<S, T> {
    transport: T,
    _schema: PhantomData<fn() -> S>,
}

impl<S, T> Sender<S, T>
where
    S: Schema,
    T: Transport,
{
    /// Create a sender that delivers through `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            _schema: PhantomData,
        }
    }

    /// The transport adapter.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the sender, returning its transport adapter.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send a message that carries a payload.
    ///
    /// # Errors
    ///
    /// - [`SendError::Transport`] with the adapter's error, unchanged.
    /// - [`SendError::Payload`] if the request cannot be encoded or the reply
    ///   cannot be decoded as `D::Response`.
    pub async fn send<D>(&self, request: D::Request) -> Result<D::Response, SendError<T::Error>>
    where
        D: Unary + Member<S>,
    {
        const {
            assert!(
                !D::REQUEST.is_empty(),
                "unary messages must declare `REQUEST = Shape::Payload`"
            );
        }
        let payload = codec::encode_request::<D>(request)?;
        self.call::<D>(payload).await
    }

    /// Send a message that carries no payload.
    ///
    /// The envelope is always forwarded without a payload.
    ///
    /// # Errors
    ///
    /// Same as [`Sender::send`].
    pub async fn send_empty<D>(&self) -> Result<D::Response, SendError<T::Error>>
    where
        D: Nullary + Member<S>,
    {
        const {
            assert!(
                D::REQUEST.is_empty(),
                "nullary messages must declare `REQUEST = Shape::Empty`"
            );
        }
        self.call::<D>(None).await
    }

    async fn call<D>(&self, payload: Option<Value>) -> Result<D::Response, SendError<T::Error>>
    where
        D: Member<S>,
    {
        let reply = self
            .transport
            .deliver(Envelope::of::<D>(payload))
            .await
            .map_err(SendError::Transport)?;
        Ok(codec::decode_response::<D>(reply)?)
    }

    /// Send an untyped message.
    ///
    /// The key must belong to `S` and the payload must fit its request
    /// shape: present for keys that take one, absent (or `null`) for keys
    /// that take none. The reply is returned as-is.
    ///
    /// # Errors
    ///
    /// - [`SendError::UnknownKey`] if `key` is not in the schema.
    /// - [`SendError::Payload`] on a calling-convention violation. The
    ///   transport is not invoked.
    /// - [`SendError::Transport`] with the adapter's error, unchanged.
    pub async fn send_raw(
        &self,
        key: &str,
        payload: Option<Value>,
    ) -> Result<Option<Value>, SendError<T::Error>> {
        let descriptor = S::descriptor(key).ok_or_else(|| SendError::UnknownKey {
            key: key.to_owned(),
            schema: S::NAME,
        })?;
        descriptor.check_request(payload.as_ref())?;

        // Normalize an explicit null on an empty key to an absent payload.
        let payload = payload.filter(|_| !descriptor.request.is_empty());
        self.transport
            .deliver(Envelope::new(descriptor.key, payload))
            .await
            .map_err(SendError::Transport)
    }
}

impl<S, T: Clone> Clone for Sender<S, T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            _schema: PhantomData,
        }
    }
}

impl<S: Schema, T> fmt::Debug for Sender<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("schema", &S::NAME)
            .finish_non_exhaustive()
    }
}
