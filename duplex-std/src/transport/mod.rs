//! # Transport Adapters
//!
//! Reference implementations of [`Transport`](duplex_core::Transport).
//!
//! | Adapter | Use Case |
//! |---------|----------|
//! | [`Loopback`] | Sender and receiver in the same process, called directly |
//! | [`FnTransport`] | Wrap any async function as the delivery step |
//! | [`ChannelTransport`] | Tokio channel to a receiver running in its own tasks |
//! | [`Timeout`] | Bound every delivery of an inner adapter |
//! | [`Traced`] | Wrap every delivery of an inner adapter in a `tracing` span |

#[cfg(feature = "channel")]
pub mod channel;
mod func;
mod loopback;
#[cfg(feature = "timeout")]
mod timeout;
mod traced;

#[cfg(feature = "channel")]
pub use channel::{ChannelError, ChannelTransport, Inbox, channel};
pub use func::{FnTransport, transport_fn};
pub use loopback::Loopback;
#[cfg(feature = "timeout")]
pub use timeout::{Timeout, TimeoutError};
pub use traced::Traced;
