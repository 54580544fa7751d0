#![allow(dead_code)]

use duplex::{Loopback, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::{
    convert::Infallible,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

// ============================================================================
// Test Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddRequest {
    pub a: i64,
    pub b: i64,
}

duplex::schema! {
    /// Arithmetic service used across the integration tests.
    pub Calculator {
        "math.add" => MathAdd(AddRequest) -> i64,
        "counter.increment" => CounterIncrement(i64),
        "ping" => Ping,
    }
}

// ============================================================================
// Test Receivers
// ============================================================================

/// A receiver with every key routed. `counter.increment` adds into `total`.
pub fn calculator(total: Arc<AtomicI64>) -> Receiver<Calculator> {
    let mut receiver = Receiver::new();
    receiver
        .route::<MathAdd>()
        .unwrap()
        .to(|req| async move { Ok::<_, Infallible>(req.a + req.b) })
        .route::<CounterIncrement>()
        .unwrap()
        .to(move |by| {
            let total = total.clone();
            async move {
                total.fetch_add(by, Ordering::SeqCst);
                Ok::<_, Infallible>(())
            }
        })
        .route::<Ping>()
        .unwrap()
        .to(|()| async { Ok::<_, Infallible>(()) });
    receiver
}

/// A sender wired straight into `receiver`.
pub fn loopback(receiver: Receiver<Calculator>) -> Sender<Calculator, Loopback<Calculator>> {
    Sender::new(Loopback::new(Arc::new(receiver)))
}
