//! Timeout wrapper for time-limited delivery.

use duplex_core::{Envelope, Transport};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Error returned by [`Timeout`].
#[derive(Error, Debug)]
pub enum TimeoutError<E>
where
    E: std::error::Error + 'static,
{
    /// The inner delivery did not complete in time.
    #[error("delivery timed out after {0:?}")]
    Elapsed(Duration),

    /// The inner transport failed.
    #[error(transparent)]
    Transport(E),
}

/// A transport that bounds every delivery of an inner transport.
///
/// The inner delivery future is dropped when the deadline passes; whether
/// the remote side still processes the message is up to the inner adapter.
#[derive(Debug, Clone)]
pub struct Timeout<T> {
    inner: T,
    duration: Duration,
}

impl<T> Timeout<T> {
    /// Create a new timeout wrapper.
    pub fn new(inner: T, duration: Duration) -> Self {
        Self { inner, duration }
    }

    /// The configured deadline.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for Timeout<T> {
    type Error = TimeoutError<T::Error>;

    async fn deliver(&self, envelope: Envelope) -> Result<Option<Value>, Self::Error> {
        match timeout(self.duration, self.inner.deliver(envelope)).await {
            Ok(result) => result.map_err(TimeoutError::Transport),
            Err(_) => Err(TimeoutError::Elapsed(self.duration)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::transport_fn;
    use serde_json::json;

    #[tokio::test]
    async fn test_elapsed() {
        let stalled = transport_fn(|_: Envelope| {
            std::future::pending::<Result<Option<Value>, std::io::Error>>()
        });
        let transport = Timeout::new(stalled, Duration::from_millis(10));

        let err = transport.deliver(Envelope::new("slow", None)).await.unwrap_err();
        assert!(matches!(err, TimeoutError::Elapsed(d) if d == Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn test_passes_through_in_time() {
        let echo = transport_fn(|envelope: Envelope| async move {
            Ok::<_, std::io::Error>(envelope.payload)
        });
        let transport = Timeout::new(echo, Duration::from_secs(5));

        let reply = transport.deliver(Envelope::new("fast", Some(json!(1)))).await.unwrap();
        assert_eq!(reply, Some(json!(1)));
    }
}
