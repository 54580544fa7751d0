//! The end-to-end calculator exchange.

mod common;

use common::{AddRequest, Calculator, CounterIncrement, MathAdd, Ping, calculator, loopback};
use duplex::{Receiver, Schema};
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

#[tokio::test]
async fn test_calculator_round_trip() {
    let total = Arc::new(AtomicI64::new(0));
    let sender = loopback(calculator(total.clone()));

    let sum = sender.send::<MathAdd>(AddRequest { a: 2, b: 3 }).await.unwrap();
    assert_eq!(sum, 5);

    sender.send::<CounterIncrement>(4).await.unwrap();
    sender.send::<CounterIncrement>(-1).await.unwrap();
    assert_eq!(total.load(Ordering::SeqCst), 3);

    sender.send_empty::<Ping>().await.unwrap();
}

#[tokio::test]
async fn test_receive_untyped_payloads() {
    let total = Arc::new(AtomicI64::new(0));
    let receiver = calculator(total.clone());

    let reply = receiver
        .receive("math.add", Some(json!({ "a": 10, "b": -4 })))
        .await
        .unwrap();
    assert_eq!(reply, Some(json!(6)));

    let reply = receiver.receive("counter.increment", Some(json!(7))).await.unwrap();
    assert_eq!(reply, Some(Value::Null));
    assert_eq!(total.load(Ordering::SeqCst), 7);

    assert_eq!(receiver.receive("ping", None).await.unwrap(), Some(Value::Null));
}

#[tokio::test]
async fn test_unknown_key_resolves_absent() {
    let receiver = calculator(Arc::new(AtomicI64::new(0)));

    let reply = receiver.receive("unknown.key", Some(Value::Null)).await.unwrap();
    assert_eq!(reply, None);
}

#[tokio::test]
async fn test_schema_key_without_handler_resolves_absent() {
    let mut receiver = Receiver::<Calculator>::new();
    receiver
        .route::<Ping>()
        .unwrap()
        .to(|()| async { Ok::<_, std::convert::Infallible>(()) });

    assert!(Calculator::descriptor("math.add").is_some());
    let reply = receiver.receive("math.add", Some(json!({ "a": 1, "b": 1 }))).await.unwrap();
    assert_eq!(reply, None);
}
