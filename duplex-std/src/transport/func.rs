//! Transport backed by a plain async function.

use duplex_core::{Envelope, Transport};
use serde_json::Value;
use std::future::Future;

/// Adapts `Fn(Envelope) -> Future<Output = Result<Option<Value>, E>>` into a
/// [`Transport`].
///
/// # Example
///
/// ```rust,ignore
/// let transport = transport_fn(move |envelope: Envelope| {
///     let client = client.clone();
///     async move { client.post_json("/rpc", &envelope).await }
/// });
/// let sender = Sender::<Calculator, _>::new(transport);
/// ```
#[derive(Clone, Copy)]
pub struct FnTransport<F>(F);

/// Create a [`FnTransport`].
pub fn transport_fn<F, Fut, E>(f: F) -> FnTransport<F>
where
    F: Fn(Envelope) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Value>, E>> + Send,
    E: std::error::Error + Send + Sync + 'static,
{
    FnTransport(f)
}

impl<F, Fut, E> Transport for FnTransport<F>
where
    F: Fn(Envelope) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<Value>, E>> + Send,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn deliver(&self, envelope: Envelope) -> impl Future<Output = Result<Option<Value>, E>> + Send {
        (self.0)(envelope)
    }
}
