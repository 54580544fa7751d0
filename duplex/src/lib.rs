//! # duplex - Schema-Typed Request/Response Messaging
//!
//! `duplex` lets a caller and a handler exchange named request/response
//! messages whose payload types are fixed by a shared schema. Sending a key
//! that is not in the schema, passing the wrong payload type, or routing a
//! handler with the wrong signature is a compile error.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use duplex::{Loopback, Receiver, Sender, schema};
//! use std::{convert::Infallible, sync::Arc};
//!
//! #[derive(Serialize, Deserialize)]
//! struct AddRequest { a: i64, b: i64 }
//!
//! schema! {
//!     pub Calculator {
//!         "math.add" => MathAdd(AddRequest) -> i64,
//!         "ping" => Ping,
//!     }
//! }
//!
//! // Handler side: one handler per key.
//! let mut receiver = Receiver::<Calculator>::new();
//! receiver
//!     .route::<MathAdd>()?
//!     .to(|req| async move { Ok::<_, Infallible>(req.a + req.b) })
//!     .route::<Ping>()?
//!     .to(|()| async { Ok::<_, Infallible>(()) });
//!
//! // Caller side: any transport adapter; here the receiver is called directly.
//! let sender = Sender::<Calculator, _>::new(Loopback::new(Arc::new(receiver)));
//! assert_eq!(sender.send::<MathAdd>(AddRequest { a: 1, b: 2 }).await?, 3);
//! sender.send_empty::<Ping>().await?;
//! ```
//!
//! ## Compile-Time Checks
//!
//! Given a schema and a sender:
//!
//! ```rust,no_run
//! # use duplex::{Receiver, Sender, testing::RecordingTransport};
//! # use std::convert::Infallible;
//! # duplex::schema! {
//! #     Calculator {
//! #         "math.add" => MathAdd((i64, i64)) -> i64,
//! #         "counter.increment" => CounterIncrement(i64),
//! #         "ping" => Ping,
//! #     }
//! # }
//! # duplex::schema! {
//! #     Thermostat {
//! #         "temp.set" => SetTemp(i64),
//! #     }
//! # }
//! async fn call(sender: Sender<Calculator, RecordingTransport>) {
//!     let _ = sender.send::<MathAdd>((1, 2)).await;
//!     let _ = sender.send::<CounterIncrement>(5).await;
//!     let _ = sender.send_empty::<Ping>().await;
//! }
//!
//! let mut receiver = Receiver::<Calculator>::new();
//! receiver
//!     .route::<CounterIncrement>()
//!     .unwrap()
//!     .to(|_by: i64| async { Ok::<_, Infallible>(()) });
//! ```
//!
//! A key that takes no payload cannot be sent with one:
//!
//! ```rust,compile_fail
//! # use duplex::{Receiver, Sender, testing::RecordingTransport};
//! # use std::convert::Infallible;
//! # duplex::schema! {
//! #     Calculator {
//! #         "math.add" => MathAdd((i64, i64)) -> i64,
//! #         "counter.increment" => CounterIncrement(i64),
//! #         "ping" => Ping,
//! #     }
//! # }
//! # duplex::schema! {
//! #     Thermostat {
//! #         "temp.set" => SetTemp(i64),
//! #     }
//! # }
//! async fn call(sender: Sender<Calculator, RecordingTransport>) {
//!     let _ = sender.send::<Ping>(()).await;
//! }
//! ```
//!
//! A key that takes a payload cannot be sent without one:
//!
//! ```rust,compile_fail
//! # use duplex::{Receiver, Sender, testing::RecordingTransport};
//! # use std::convert::Infallible;
//! # duplex::schema! {
//! #     Calculator {
//! #         "math.add" => MathAdd((i64, i64)) -> i64,
//! #         "counter.increment" => CounterIncrement(i64),
//! #         "ping" => Ping,
//! #     }
//! # }
//! # duplex::schema! {
//! #     Thermostat {
//! #         "temp.set" => SetTemp(i64),
//! #     }
//! # }
//! async fn call(sender: Sender<Calculator, RecordingTransport>) {
//!     let _ = sender.send_empty::<MathAdd>().await;
//! }
//! ```
//!
//! The payload must have the key's request type:
//!
//! ```rust,compile_fail
//! # use duplex::{Receiver, Sender, testing::RecordingTransport};
//! # use std::convert::Infallible;
//! # duplex::schema! {
//! #     Calculator {
//! #         "math.add" => MathAdd((i64, i64)) -> i64,
//! #         "counter.increment" => CounterIncrement(i64),
//! #         "ping" => Ping,
//! #     }
//! # }
//! # duplex::schema! {
//! #     Thermostat {
//! #         "temp.set" => SetTemp(i64),
//! #     }
//! # }
//! async fn call(sender: Sender<Calculator, RecordingTransport>) {
//!     let _ = sender.send::<CounterIncrement>("five".to_string()).await;
//! }
//! ```
//!
//! Keys of another schema are rejected by both sides:
//!
//! ```rust,compile_fail
//! # use duplex::{Receiver, Sender, testing::RecordingTransport};
//! # use std::convert::Infallible;
//! # duplex::schema! {
//! #     Calculator {
//! #         "math.add" => MathAdd((i64, i64)) -> i64,
//! #         "counter.increment" => CounterIncrement(i64),
//! #         "ping" => Ping,
//! #     }
//! # }
//! # duplex::schema! {
//! #     Thermostat {
//! #         "temp.set" => SetTemp(i64),
//! #     }
//! # }
//! async fn call(sender: Sender<Calculator, RecordingTransport>) {
//!     let _ = sender.send::<SetTemp>(21).await;
//! }
//! ```
//!
//! ```rust,compile_fail
//! # use duplex::{Receiver, Sender, testing::RecordingTransport};
//! # use std::convert::Infallible;
//! # duplex::schema! {
//! #     Calculator {
//! #         "math.add" => MathAdd((i64, i64)) -> i64,
//! #         "counter.increment" => CounterIncrement(i64),
//! #         "ping" => Ping,
//! #     }
//! # }
//! # duplex::schema! {
//! #     Thermostat {
//! #         "temp.set" => SetTemp(i64),
//! #     }
//! # }
//! let mut receiver = Receiver::<Calculator>::new();
//! let _ = receiver.route::<SetTemp>();
//! ```
//!
//! A handler must accept the key's request type:
//!
//! ```rust,compile_fail
//! # use duplex::{Receiver, Sender, testing::RecordingTransport};
//! # use std::convert::Infallible;
//! # duplex::schema! {
//! #     Calculator {
//! #         "math.add" => MathAdd((i64, i64)) -> i64,
//! #         "counter.increment" => CounterIncrement(i64),
//! #         "ping" => Ping,
//! #     }
//! # }
//! # duplex::schema! {
//! #     Thermostat {
//! #         "temp.set" => SetTemp(i64),
//! #     }
//! # }
//! let mut receiver = Receiver::<Calculator>::new();
//! receiver
//!     .route::<CounterIncrement>()
//!     .unwrap()
//!     .to(|_by: String| async { Ok::<_, Infallible>(()) });
//! ```
//!
//! A schema cannot declare the same key twice:
//!
//! ```rust,compile_fail
//! duplex::schema! {
//!     Calculator {
//!         "ping" => Ping,
//!         "ping" => PingAgain,
//!     }
//! }
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use duplex_core::{
    // Errors
    BoxError,
    ContractViolation,
    // Handler
    ContextFn,
    // Schema model
    Descriptor,
    DispatchError,
    Duplex,
    DuplexError,
    // Transport
    DynTransport,
    Envelope,
    FnHandler,
    Handler,
    Member,
    // Message
    Message,
    Nullary,
    PayloadError,
    RouteConflict,
    Schema,
    SendError,
    Shape,
    Transport,
    Unary,
    codec,
};

// Sending and receiving
pub use duplex_std::{Receiver, Route, Sender, Unroutable};

// Transport adapters
pub use duplex_std::transport::{FnTransport, Loopback, Traced, transport_fn};

/// Transport adapters.
pub mod transport {
    #[cfg(feature = "channel")]
    pub use duplex_std::transport::{ChannelError, ChannelTransport, Inbox, channel};
    pub use duplex_std::transport::{FnTransport, Loopback, Traced, transport_fn};
    #[cfg(feature = "timeout")]
    pub use duplex_std::transport::{Timeout, TimeoutError};
}

/// Testing utilities.
pub mod testing {
    pub use duplex_std::testing::{CountingHandler, RecordedError, RecordingTransport};
}

/// Prelude module - common imports for Duplex.
///
/// # Usage
///
/// ```rust,ignore
/// use duplex::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, DispatchError, Duplex, Handler, Member, Nullary, Receiver, Schema, SendError,
        Sender, Transport, Unary,
    };

    #[cfg(feature = "macros")]
    pub use crate::schema;
}

#[cfg(feature = "macros")]
pub use duplex_macros::schema;
