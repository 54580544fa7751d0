//! Tracing wrapper for transports.

use duplex_core::{Envelope, Transport};
use serde_json::Value;

#[cfg(feature = "tracing")]
use tracing::Instrument;

/// A transport wrapper that instruments every delivery with a `tracing` span.
///
/// The span is named `deliver` and records the adapter name and the message
/// key; failed deliveries are logged at `warn`. Without the `tracing` feature
/// the wrapper is a plain pass-through.
#[derive(Debug, Clone)]
pub struct Traced<T> {
    inner: T,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    name: &'static str,
}

impl<T> Traced<T> {
    /// Wrap `inner`, labelling its spans with `name`.
    pub const fn new(inner: T, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for Traced<T> {
    type Error = T::Error;

    #[cfg(feature = "tracing")]
    async fn deliver(&self, envelope: Envelope) -> Result<Option<Value>, Self::Error> {
        let span = tracing::info_span!(
            "deliver",
            transport = %self.name,
            key = %envelope.key,
        );

        async move {
            let result = self.inner.deliver(envelope).await;
            if let Err(error) = &result {
                tracing::warn!(%error, "delivery failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    #[cfg(not(feature = "tracing"))]
    async fn deliver(&self, envelope: Envelope) -> Result<Option<Value>, Self::Error> {
        self.inner.deliver(envelope).await
    }
}
