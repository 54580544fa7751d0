//! Error types for Duplex.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`DuplexError`] - Top-level error type for applications
//! - [`RouteConflict`] - A key was routed twice on one receiver
//! - [`DispatchError`] - Errors while a receiver dispatches a message
//! - [`SendError`] - Errors while a sender delivers a message
//! - [`PayloadError`] - Errors crossing the erased payload boundary
//! - [`ContractViolation`] - A payload that does not fit the calling convention

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for applications built on Duplex.
#[derive(Error, Debug)]
pub enum DuplexError {
    /// A handler registration failed.
    #[error("routing error: {0}")]
    Route(#[from] RouteConflict),

    /// An inbound message could not be dispatched.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// An outbound message failed over an in-process transport.
    #[error("send error: {0}")]
    Send(#[from] SendError<DispatchError>),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Returned by `route` when the key already has a handler.
///
/// The existing registration is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("route already exists for key: {key}")]
pub struct RouteConflict {
    /// The conflicting key.
    pub key: &'static str,
}

/// A payload that does not match the calling convention of its key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// A payload was supplied for a key that takes none.
    #[error("message `{key}` takes no payload, but one was supplied")]
    UnexpectedPayload {
        /// The message key.
        key: &'static str,
    },

    /// No payload was supplied for a key that requires one.
    #[error("message `{key}` requires a payload, but none was supplied")]
    MissingPayload {
        /// The message key.
        key: &'static str,
    },
}

/// Errors raised while converting between typed values and erased payloads.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// The payload does not fit the calling convention.
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    /// The payload could not be serialized or deserialized.
    #[error("invalid payload for `{key}`")]
    Codec {
        /// The message key.
        key: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The transport returned nothing for a key that answers with a value.
    #[error("message `{key}` expects a response, but none was returned")]
    Unanswered {
        /// The message key.
        key: &'static str,
    },
}

/// Errors that can occur while a receiver dispatches a message.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No handler is registered for the key, and the receiver rejects
    /// unroutable messages.
    #[error("no route found for key: {key}")]
    Unroutable {
        /// The key that was received.
        key: String,
    },

    /// The payload could not be handed to the handler.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// The handler failed. The handler's own error is carried unchanged.
    #[error(transparent)]
    Handler(BoxError),
}

/// Errors that can occur while a sender delivers a message.
#[derive(Error, Debug)]
pub enum SendError<E>
where
    E: std::error::Error + 'static,
{
    /// The transport adapter failed. Its error is carried unchanged.
    #[error(transparent)]
    Transport(E),

    /// An untyped send named a key outside the schema.
    #[error("message key `{key}` is not part of schema `{schema}`")]
    UnknownKey {
        /// The key that was sent.
        key: String,
        /// Name of the sender's schema.
        schema: &'static str,
    },

    /// The request or the reply could not cross the payload boundary.
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl<E> SendError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns the transport error, if this is one.
    pub fn transport(&self) -> Option<&E> {
        match self {
            SendError::Transport(e) => Some(e),
            _ => None,
        }
    }

    /// Consumes the error, returning the transport error if this is one.
    pub fn into_transport(self) -> Option<E> {
        match self {
            SendError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

// Convenience conversions
impl From<BoxError> for DuplexError {
    fn from(err: BoxError) -> Self {
        DuplexError::Custom(err)
    }
}

impl From<ContractViolation> for DispatchError {
    fn from(err: ContractViolation) -> Self {
        DispatchError::Payload(PayloadError::Contract(err))
    }
}

impl<E> From<ContractViolation> for SendError<E>
where
    E: std::error::Error + 'static,
{
    fn from(err: ContractViolation) -> Self {
        SendError::Payload(PayloadError::Contract(err))
    }
}
