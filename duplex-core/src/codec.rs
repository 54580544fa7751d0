//! Conversion between typed messages and erased payloads.
//!
//! Senders and receivers only exchange `Option<serde_json::Value>`. These
//! functions apply the [`Shape`] rules of a [`Duplex`] on both ends:
//!
//! | Side     | `Shape::Empty`               | `Shape::Payload`           |
//! |----------|------------------------------|----------------------------|
//! | request  | absent (`None`)              | `Some(value)`, required    |
//! | response | ignored, decodes from `null` | `Some(value)`, required    |

use crate::{
    error::{ContractViolation, PayloadError},
    schema::{Duplex, Shape},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Encodes a request for the transport.
pub fn encode_request<D: Duplex>(request: D::Request) -> Result<Option<Value>, PayloadError> {
    match D::REQUEST {
        Shape::Empty => Ok(None),
        Shape::Payload => encode::<D, _>(&request).map(Some),
    }
}

/// Decodes an inbound payload into the request type.
pub fn decode_request<D: Duplex>(payload: Option<Value>) -> Result<D::Request, PayloadError> {
    match (D::REQUEST, payload) {
        (Shape::Empty, None | Some(Value::Null)) => decode::<D, _>(Value::Null),
        (Shape::Empty, Some(_)) => Err(ContractViolation::UnexpectedPayload { key: D::KEY }.into()),
        (Shape::Payload, None) => Err(ContractViolation::MissingPayload { key: D::KEY }.into()),
        (Shape::Payload, Some(value)) => decode::<D, _>(value),
    }
}

/// Encodes a handler's response for the transport.
pub fn encode_response<D: Duplex>(response: D::Response) -> Result<Value, PayloadError> {
    match D::RESPONSE {
        Shape::Empty => Ok(Value::Null),
        Shape::Payload => encode::<D, _>(&response),
    }
}

/// Decodes a transport reply into the response type.
pub fn decode_response<D: Duplex>(reply: Option<Value>) -> Result<D::Response, PayloadError> {
    match (D::RESPONSE, reply) {
        (Shape::Empty, _) => decode::<D, _>(Value::Null),
        (Shape::Payload, None) => Err(PayloadError::Unanswered { key: D::KEY }),
        (Shape::Payload, Some(value)) => decode::<D, _>(value),
    }
}

fn encode<D: Duplex, T: Serialize>(value: &T) -> Result<Value, PayloadError> {
    serde_json::to_value(value).map_err(|source| PayloadError::Codec { key: D::KEY, source })
}

fn decode<D: Duplex, T: DeserializeOwned>(value: Value) -> Result<T, PayloadError> {
    serde_json::from_value(value).map_err(|source| PayloadError::Codec { key: D::KEY, source })
}
