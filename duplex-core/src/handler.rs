//! # Handler
//!
//! A handler is the terminal endpoint of a message: it receives the decoded
//! request of one [`Duplex`] and answers with its response.
//!
//! # Usage Patterns
//!
//! 1. **Closure**: `receiver.route::<D>()?.to(|req| async move { ... })`,
//!    wrapped in [`FnHandler`]
//! 2. **Closure with context**: `.to_with_context(|ctx, req| async move { ... })`,
//!    wrapped in [`ContextFn`]
//! 3. **Struct implementation**: `impl Handler<MyMessage> for MyService`
//!
//! The context parameter `C` is opaque to the framework. It is supplied by
//! whoever calls `receive_with` (connection info, request metadata) and is
//! `()` for plain receivers.

use crate::{error::BoxError, schema::Duplex};
use std::future::Future;

/// The endpoint answering one message kind.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle message `{D}`",
    label = "missing `Handler<{D}>` implementation",
    note = "Handlers must accept `{D}::Request` and return a future of `Result<{D}::Response, BoxError>`."
)]
pub trait Handler<D: Duplex, C = ()>: Send + Sync + 'static {
    /// Handles one request.
    fn call(
        &self,
        ctx: C,
        request: D::Request,
    ) -> impl Future<Output = Result<D::Response, BoxError>> + Send;
}

/// Adapts a closure `Fn(Request) -> Future` into a [`Handler`].
///
/// The closure never sees the context, so the same handler can be routed on
/// receivers of any context type.
#[derive(Clone, Copy)]
pub struct FnHandler<F>(F);

impl<F> FnHandler<F> {
    /// Wrap a closure.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<D, C, F, Fut, E> Handler<D, C> for FnHandler<F>
where
    D: Duplex,
    F: Fn(D::Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<D::Response, E>> + Send,
    E: Into<BoxError>,
{
    fn call(
        &self,
        _ctx: C,
        request: D::Request,
    ) -> impl Future<Output = Result<D::Response, BoxError>> + Send {
        let fut = (self.0)(request);
        async move { fut.await.map_err(Into::into) }
    }
}

/// Adapts a closure `Fn(Context, Request) -> Future` into a [`Handler`].
#[derive(Clone, Copy)]
pub struct ContextFn<F>(F);

impl<F> ContextFn<F> {
    /// Wrap a closure.
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<D, C, F, Fut, E> Handler<D, C> for ContextFn<F>
where
    D: Duplex,
    F: Fn(C, D::Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<D::Response, E>> + Send,
    E: Into<BoxError>,
{
    fn call(
        &self,
        ctx: C,
        request: D::Request,
    ) -> impl Future<Output = Result<D::Response, BoxError>> + Send {
        let fut = (self.0)(ctx, request);
        async move { fut.await.map_err(Into::into) }
    }
}
