mod common;

use common::{AddRequest, Calculator, CounterIncrement, MathAdd, Ping, calculator, loopback};
use duplex::{
    DispatchError, DynTransport, Envelope, Receiver, SendError, Sender, Transport, transport_fn,
    testing::RecordingTransport,
};
use serde_json::{Value, json};
use std::sync::{Arc, atomic::AtomicI64};

#[derive(Debug, thiserror::Error)]
#[error("connection refused")]
struct Refused;

#[tokio::test]
async fn test_envelope_carries_key_and_payload() {
    let transport = RecordingTransport::replying(json!(9));
    let sender = Sender::<Calculator, _>::new(transport.clone());

    let sum = sender.send::<MathAdd>(AddRequest { a: 4, b: 5 }).await.unwrap();
    assert_eq!(sum, 9);

    transport.set_reply(None);
    sender.send_empty::<Ping>().await.unwrap();

    assert_eq!(
        transport.envelopes(),
        vec![
            Envelope::new("math.add", Some(json!({ "a": 4, "b": 5 }))),
            Envelope::new("ping", None),
        ]
    );
}

#[tokio::test]
async fn test_function_transport() {
    let receiver = Arc::new(calculator(Arc::new(AtomicI64::new(0))));
    let transport = transport_fn(move |envelope: Envelope| {
        let receiver = receiver.clone();
        async move {
            let Envelope { key, payload } = envelope;
            receiver.receive(&key, payload).await
        }
    });
    let sender = Sender::<Calculator, _>::new(transport);

    let sum = sender.send::<MathAdd>(AddRequest { a: -2, b: 8 }).await.unwrap();
    assert_eq!(sum, 6);
}

#[tokio::test]
async fn test_transport_error_reaches_caller() {
    let transport = transport_fn(|_: Envelope| async { Err::<Option<Value>, _>(Refused) });
    let sender = Sender::<Calculator, _>::new(transport);

    let err = sender.send::<CounterIncrement>(1).await.unwrap_err();
    assert!(matches!(err, SendError::Transport(Refused)));
    assert_eq!(err.to_string(), "connection refused");
}

#[tokio::test]
async fn test_handler_error_crosses_loopback() {
    let mut receiver = Receiver::<Calculator>::new();
    receiver
        .route::<CounterIncrement>()
        .unwrap()
        .to(|_| async { Err::<(), _>(Refused) });
    let sender = loopback(receiver);

    let err = sender.send::<CounterIncrement>(1).await.unwrap_err();
    let dispatch = err.into_transport().unwrap();
    assert!(matches!(dispatch, DispatchError::Handler(ref e) if e.is::<Refused>()));
}

#[tokio::test]
async fn test_boxed_transport() {
    let transport: Box<dyn DynTransport<Error = DispatchError>> = Box::new(
        duplex::Loopback::new(Arc::new(calculator(Arc::new(AtomicI64::new(0))))),
    );
    let reply = transport
        .deliver(Envelope::new("math.add", Some(json!({ "a": 1, "b": 1 }))))
        .await
        .unwrap();
    assert_eq!(reply, Some(json!(2)));

    let sender = Sender::<Calculator, _>::new(transport);
    sender.send_empty::<Ping>().await.unwrap();
}

#[tokio::test]
async fn test_send_raw() {
    let sender = loopback(calculator(Arc::new(AtomicI64::new(0))));

    let reply = sender
        .send_raw("math.add", Some(json!({ "a": 3, "b": 4 })))
        .await
        .unwrap();
    assert_eq!(reply, Some(json!(7)));

    let err = sender.send_raw("unknown.key", None).await.unwrap_err();
    assert!(matches!(
        err,
        SendError::UnknownKey { ref key, schema: "Calculator" } if key == "unknown.key"
    ));

    let err = sender.send_raw("ping", Some(json!("hello"))).await.unwrap_err();
    assert!(matches!(err, SendError::Payload(_)));
}

#[tokio::test]
async fn test_unrouted_key_is_unanswered() {
    // Dropped messages resolve to nothing.
    let sender = loopback(Receiver::<Calculator>::new());

    let err = sender.send::<MathAdd>(AddRequest { a: 1, b: 1 }).await.unwrap_err();
    assert!(matches!(err, SendError::Payload(_)));

    // A key with an empty response has nothing to miss.
    sender.send_empty::<Ping>().await.unwrap();
}
