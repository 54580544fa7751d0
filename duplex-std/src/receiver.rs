//! # Receiver
//!
//! The receiver owns the routing table of one endpoint and dispatches inbound
//! messages to the handler registered for their key.
//!
//! Registration is a two-step, single-shot operation:
//!
//! ```rust,ignore
//! let mut receiver = Receiver::<Calculator>::new();
//! receiver
//!     .route::<MathAdd>()?                                   // fails on a second call
//!     .to(|req| async move { Ok::<_, Infallible>(req.a + req.b) });
//! ```
//!
//! `route` alone registers nothing; the returned [`Route`] borrows the
//! receiver mutably until one of its `to*` methods inserts the handler.
//!
//! Once built, the receiver is read-only and is usually shared behind an
//! `Arc`. Dispatch takes `&self`, so any number of `receive` calls may be in
//! flight at once.
//!
//! # Context
//!
//! `Receiver<S, C>` threads an opaque context value of type `C` from
//! [`Receiver::receive_with`] to every handler. Plain receivers use `C = ()`
//! and [`Receiver::receive`].

use duplex_core::{
    BoxError, ContextFn, DispatchError, Duplex, FnHandler, Handler, Member, RouteConflict, Schema,
    codec,
};
use futures::future::BoxFuture;
use serde_json::Value;
use std::{collections::HashMap, fmt, future::Future, marker::PhantomData};

/// What a receiver does with a message whose key has no handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unroutable {
    /// Resolve to `Ok(None)` without raising an error.
    #[default]
    Drop,
    /// Fail with [`DispatchError::Unroutable`].
    Reject,
}

/// Object-safe, type-erased handler stored in the routing table.
trait DynHandler<C>: Send + Sync + 'static {
    fn call_dyn(&self, ctx: C, payload: Option<Value>) -> BoxFuture<'_, Result<Value, DispatchError>>;
}

/// Binds a [`Handler`] to the payload boundary of its message.
struct Typed<D, H> {
    handler: H,
    _duplex: PhantomData<fn() -> D>,
}

impl<D, C, H> DynHandler<C> for Typed<D, H>
where
    D: Duplex,
    C: Send + 'static,
    H: Handler<D, C>,
{
    fn call_dyn(&self, ctx: C, payload: Option<Value>) -> BoxFuture<'_, Result<Value, DispatchError>> {
        Box::pin(async move {
            let request = codec::decode_request::<D>(payload)?;
            let response = self
                .handler
                .call(ctx, request)
                .await
                .map_err(DispatchError::Handler)?;
            Ok(codec::encode_response::<D>(response)?)
        })
    }
}

/// Routing table and dispatcher for the messages of schema `S`.
pub struct Receiver<S, C = ()> {
    routes: HashMap<&'static str, Box<dyn DynHandler<C>>>,
    policy: Unroutable,
    _schema: PhantomData<fn() -> S>,
}

impl<S, C> Receiver<S, C>
where
    S: Schema,
    C: Send + 'static,
{
    /// Create an empty receiver that drops unroutable messages.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            policy: Unroutable::Drop,
            _schema: PhantomData,
        }
    }

    /// Set the unroutable-message policy.
    pub fn with_policy(mut self, policy: Unroutable) -> Self {
        self.policy = policy;
        self
    }

    /// Fail with [`DispatchError::Unroutable`] instead of dropping messages
    /// with no handler.
    pub fn reject_unroutable(self) -> Self {
        self.with_policy(Unroutable::Reject)
    }

    /// The unroutable-message policy in effect.
    pub fn policy(&self) -> Unroutable {
        self.policy
    }

    /// Begin registering a handler for message `D`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteConflict`] if `D::KEY` already has a handler. The
    /// existing handler stays in place.
    pub fn route<D: Member<S>>(&mut self) -> Result<Route<'_, S, C, D>, RouteConflict> {
        if self.routes.contains_key(D::KEY) {
            return Err(RouteConflict { key: D::KEY });
        }
        Ok(Route {
            receiver: self,
            _duplex: PhantomData,
        })
    }

    /// Returns true if `key` has a handler.
    pub fn contains(&self, key: &str) -> bool {
        self.routes.contains_key(key)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over the registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.keys().copied()
    }

    /// Dispatch a message, handing `ctx` to its handler.
    ///
    /// Resolves to:
    /// - `Ok(Some(response))` when a handler ran; a response with no
    ///   meaningful value is `Value::Null`.
    /// - `Ok(None)` when no handler matches and the policy is
    ///   [`Unroutable::Drop`]. No handler runs.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Unroutable`] under [`Unroutable::Reject`].
    /// - [`DispatchError::Payload`] if the payload does not fit the key.
    /// - [`DispatchError::Handler`] carrying the handler's own error.
    pub async fn receive_with(
        &self,
        ctx: C,
        key: &str,
        payload: Option<Value>,
    ) -> Result<Option<Value>, DispatchError> {
        let Some(handler) = self.routes.get(key) else {
            return self.unroutable(key);
        };
        handler.call_dyn(ctx, payload).await.map(Some)
    }

    fn unroutable(&self, key: &str) -> Result<Option<Value>, DispatchError> {
        match self.policy {
            Unroutable::Drop => {
                #[cfg(feature = "tracing")]
                tracing::debug!(schema = S::NAME, key, "dropping unroutable message");
                Ok(None)
            }
            Unroutable::Reject => Err(DispatchError::Unroutable {
                key: key.to_owned(),
            }),
        }
    }

    fn insert<D, H>(&mut self, handler: H)
    where
        D: Duplex,
        H: Handler<D, C>,
    {
        #[cfg(feature = "tracing")]
        tracing::trace!(schema = S::NAME, key = D::KEY, "route registered");

        self.routes.insert(
            D::KEY,
            Box::new(Typed::<D, H> {
                handler,
                _duplex: PhantomData,
            }),
        );
    }
}

impl<S: Schema> Receiver<S, ()> {
    /// Dispatch a message on a receiver without context.
    ///
    /// See [`Receiver::receive_with`].
    pub async fn receive(
        &self,
        key: &str,
        payload: Option<Value>,
    ) -> Result<Option<Value>, DispatchError> {
        self.receive_with((), key, payload).await
    }
}

impl<S, C> Default for Receiver<S, C>
where
    S: Schema,
    C: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema, C> fmt::Debug for Receiver<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.routes.keys().collect();
        keys.sort_unstable();
        f.debug_struct("Receiver")
            .field("schema", &S::NAME)
            .field("routes", &keys)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Pending registration for exactly one key.
///
/// Nothing enters the routing table until one of the `to*` methods is
/// called; dropping the route leaves the key unregistered.
#[must_use = "a route registers nothing until `to` is called"]
pub struct Route<'r, S, C, D> {
    receiver: &'r mut Receiver<S, C>,
    _duplex: PhantomData<fn() -> D>,
}

impl<'r, S, C, D> Route<'r, S, C, D>
where
    S: Schema,
    C: Send + 'static,
    D: Member<S>,
{
    /// The key being registered.
    pub fn key(&self) -> &'static str {
        D::KEY
    }

    /// Register a closure that takes the request.
    ///
    /// Returns the receiver for further registrations.
    pub fn to<F, Fut, E>(self, handler: F) -> &'r mut Receiver<S, C>
    where
        F: Fn(D::Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<D::Response, E>> + Send,
        E: Into<BoxError>,
    {
        self.to_handler(FnHandler::new(handler))
    }

    /// Register a closure that takes the dispatch context and the request.
    pub fn to_with_context<F, Fut, E>(self, handler: F) -> &'r mut Receiver<S, C>
    where
        F: Fn(C, D::Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<D::Response, E>> + Send,
        E: Into<BoxError>,
    {
        self.to_handler(ContextFn::new(handler))
    }

    /// Register any [`Handler`] implementation.
    pub fn to_handler<H: Handler<D, C>>(self, handler: H) -> &'r mut Receiver<S, C> {
        self.receiver.insert::<D, H>(handler);
        self.receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duplex_core::{Descriptor, PayloadError, Shape};
    use serde_json::json;
    use std::{
        convert::Infallible,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    struct Kv;
    struct Get;
    struct Clear;

    impl Duplex for Get {
        const KEY: &'static str = "kv.get";
        const REQUEST: Shape = Shape::Payload;
        const RESPONSE: Shape = Shape::Payload;
        type Request = String;
        type Response = Option<String>;
    }
    impl Member<Kv> for Get {}

    impl Duplex for Clear {
        const KEY: &'static str = "kv.clear";
        const REQUEST: Shape = Shape::Empty;
        const RESPONSE: Shape = Shape::Empty;
        type Request = ();
        type Response = ();
    }
    impl Member<Kv> for Clear {}

    impl Schema for Kv {
        const NAME: &'static str = "Kv";

        fn descriptors() -> &'static [Descriptor] {
            const DESCRIPTORS: &[Descriptor] = &[Descriptor::of::<Get>(), Descriptor::of::<Clear>()];
            DESCRIPTORS
        }
    }

    #[tokio::test]
    async fn test_dispatch_to_registered_handler() {
        let mut receiver = Receiver::<Kv>::new();
        receiver
            .route::<Get>()
            .unwrap()
            .to(|key: String| async move { Ok::<_, Infallible>(Some(key.to_uppercase())) });

        let reply = receiver.receive("kv.get", Some(json!("abc"))).await.unwrap();
        assert_eq!(reply, Some(json!("ABC")));
    }

    #[tokio::test]
    async fn test_empty_response_is_null() {
        let mut receiver = Receiver::<Kv>::new();
        receiver
            .route::<Clear>()
            .unwrap()
            .to(|()| async { Ok::<_, Infallible>(()) });

        assert_eq!(receiver.receive("kv.clear", None).await.unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_route_conflict_keeps_first() {
        let mut receiver = Receiver::<Kv>::new();
        receiver
            .route::<Get>()
            .unwrap()
            .to(|_: String| async { Ok::<_, Infallible>(None) });

        let err = receiver.route::<Get>().err();
        assert_eq!(err, Some(RouteConflict { key: "kv.get" }));
        assert_eq!(receiver.len(), 1);
    }

    #[test]
    fn test_dropped_route_registers_nothing() {
        let mut receiver = Receiver::<Kv>::new();
        let route = receiver.route::<Get>().unwrap();
        assert_eq!(route.key(), "kv.get");
        drop(route);

        assert!(receiver.is_empty());
        assert!(receiver.route::<Get>().is_ok());
    }

    #[tokio::test]
    async fn test_unroutable_policies() {
        let dropping = Receiver::<Kv>::new();
        assert_eq!(dropping.receive("kv.put", Some(json!(1))).await.unwrap(), None);

        let rejecting = Receiver::<Kv>::new().reject_unroutable();
        assert_eq!(rejecting.policy(), Unroutable::Reject);
        let err = rejecting.receive("kv.put", None).await.unwrap_err();
        assert!(matches!(err, DispatchError::Unroutable { key } if key == "kv.put"));
    }

    #[tokio::test]
    async fn test_payload_violation_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut receiver = Receiver::<Kv>::new();
        receiver.route::<Get>().unwrap().to(move |_: String| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, Infallible>(None) }
        });

        let err = receiver.receive("kv.get", None).await.unwrap_err();
        assert!(matches!(err, DispatchError::Payload(PayloadError::Contract(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_context_reaches_handler() {
        let mut receiver = Receiver::<Kv, &'static str>::new();
        receiver
            .route::<Get>()
            .unwrap()
            .to_with_context(|peer: &'static str, key: String| async move {
                Ok::<_, Infallible>(Some(format!("{peer}:{key}")))
            });

        let reply = receiver
            .receive_with("node-1", "kv.get", Some(json!("a")))
            .await
            .unwrap();
        assert_eq!(reply, Some(json!("node-1:a")));
    }

    #[test]
    fn test_debug_lists_routes() {
        let mut receiver = Receiver::<Kv>::new();
        receiver
            .route::<Clear>()
            .unwrap()
            .to(|()| async { Ok::<_, Infallible>(()) })
            .route::<Get>()
            .unwrap()
            .to(|_: String| async { Ok::<_, Infallible>(None) });

        let debug = format!("{receiver:?}");
        assert!(debug.contains(r#"routes: ["kv.clear", "kv.get"]"#));
        assert!(receiver.contains("kv.get"));
    }
}
