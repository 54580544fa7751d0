//! # duplex-core
//!
//! Core traits for the Duplex schema-typed messaging framework.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! transport adapters and handler libraries that don't need the full
//! `duplex-std` implementation.
//!
//! # Architecture
//!
//! Two decoupled parties exchange named request/response messages whose
//! payload types are fixed by a shared schema:
//!
//! ```text
//! Sender::send::<D>(req) ──► Transport::deliver(Envelope) ──► Receiver::receive(key, payload)
//!                                                                     │
//!            D::Response ◄──────────── reply ◄──────────── Handler<D>::call(req)
//! ```
//!
//! ## Schema Model ([`Duplex`], [`Schema`])
//!
//! Each message key is bound to a `(Request, Response)` pair at the type
//! level. A schema is the closed set of those keys. A mismatched key or
//! payload type is a compile error on both the sending and handling side.
//!
//! ## Handler ([`Handler`])
//!
//! The terminal endpoint for one key. Plain closures are adapted with
//! [`FnHandler`] and [`ContextFn`].
//!
//! ## Transport ([`Transport`])
//!
//! The opaque function a sender calls through. Everything physical lives
//! behind it.
//!
//! ## Payload boundary ([`codec`])
//!
//! Typed values cross the transport as `serde_json::Value`.
//!
//! # Error Types
//!
//! - [`DuplexError`] - Top-level error type
//! - [`RouteConflict`] - Duplicate registration
//! - [`DispatchError`] - Receiver-side errors
//! - [`SendError`] - Sender-side errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub mod codec;
mod error;
mod handler;
mod message;
mod schema;
mod transport;

// Re-exports
pub use error::{
    BoxError, ContractViolation, DispatchError, DuplexError, PayloadError, RouteConflict,
    SendError,
};
pub use handler::{ContextFn, FnHandler, Handler};
pub use message::Message;
pub use schema::{Descriptor, Duplex, Member, Nullary, Schema, Shape, Unary};
pub use transport::{DynTransport, Envelope, Transport};
