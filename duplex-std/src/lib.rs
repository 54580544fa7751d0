//! # duplex-std
//!
//! Standard implementations for the Duplex messaging framework.
//!
//! This crate provides:
//! - **Receiving**: [`Receiver`], its per-key binder [`Route`] and the
//!   [`Unroutable`] policy
//! - **Sending**: [`Sender`]
//! - **Transport adapters**: loopback, function, tokio channel, timeout and
//!   tracing wrappers in [`transport`]
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use duplex_core;

// Modules
pub mod receiver;
pub mod sender;
pub mod testing;
pub mod transport;

pub use receiver::{Receiver, Route, Unroutable};
pub use sender::Sender;
