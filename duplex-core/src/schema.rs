//! # Schema Model
//!
//! A schema is a closed set of message keys, each mapped to a request and a
//! response type. The mapping lives almost entirely at the type level:
//!
//! - [`Duplex`] ties one key to its `(Request, Response)` pair.
//! - [`Member`] declares that a key belongs to a [`Schema`].
//! - [`Unary`] and [`Nullary`] fix the calling convention of a key: one
//!   payload argument, or none at all.
//!
//! The only runtime trace of a schema is its table of [`Descriptor`]s, used
//! to validate calls that arrive through an untyped path.
//!
//! Schemas are usually declared with the `schema!` macro from the `duplex`
//! crate, which implements all of the above for each entry.

use crate::error::ContractViolation;
use serde_json::Value;

/// Whether one side of a message carries a meaningful value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Nothing is carried. Requests omit the payload entirely and responses
    /// carry no meaningful result.
    Empty,
    /// A value of the declared type is carried.
    Payload,
}

impl Shape {
    /// Returns true for [`Shape::Empty`].
    pub const fn is_empty(self) -> bool {
        matches!(self, Shape::Empty)
    }
}

/// The request/response pair bound to one message key.
///
/// Implemented by a zero-sized marker type; no value of the marker is ever
/// constructed by the framework.
///
/// # Example
///
/// ```rust,ignore
/// struct MathAdd;
///
/// impl Duplex for MathAdd {
///     const KEY: &'static str = "math.add";
///     const REQUEST: Shape = Shape::Payload;
///     const RESPONSE: Shape = Shape::Payload;
///     type Request = AddRequest;
///     type Response = i64;
/// }
/// impl Unary for MathAdd {}
/// impl Member<Calculator> for MathAdd {}
/// ```
///
/// Both shapes must be declared, so a key with no payload cannot be
/// mistaken for one that takes `()`:
///
/// ```rust,compile_fail
/// use duplex_core::{Duplex, Nullary};
///
/// struct Ping;
///
/// impl Duplex for Ping {
///     const KEY: &'static str = "ping";
///     type Request = ();
///     type Response = ();
/// }
/// impl Nullary for Ping {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a message of any schema",
    label = "missing `Duplex` implementation",
    note = "Declare the message with `schema!` or implement `Duplex` for its marker type."
)]
pub trait Duplex: Send + Sync + 'static {
    /// The key naming this message within its schema.
    const KEY: &'static str;

    /// Shape of the request side. [`Shape::Empty`] exactly when the
    /// message is [`Nullary`].
    const REQUEST: Shape;

    /// Shape of the response side. [`Shape::Empty`] when the response
    /// carries no meaningful result.
    const RESPONSE: Shape;

    /// The payload a caller must supply.
    type Request: crate::Message;

    /// The value a handler answers with.
    type Response: crate::Message;
}

/// A message that is sent with exactly one payload argument.
pub trait Unary: Duplex {}

/// A message that is sent without any payload argument.
pub trait Nullary: Duplex<Request = ()> {}

/// Declares that a message belongs to schema `S`.
///
/// Senders and receivers parameterized over `S` only accept members of `S`,
/// which makes the key set of a schema closed.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a member of schema `{S}`",
    label = "message from a different schema",
    note = "Only messages declared in `{S}` can be sent or routed here."
)]
pub trait Member<S: Schema>: Duplex {}

/// Runtime description of one message key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor {
    /// The message key.
    pub key: &'static str,
    /// Shape of the request side.
    pub request: Shape,
    /// Shape of the response side.
    pub response: Shape,
}

impl Descriptor {
    /// Builds the descriptor of a message type.
    pub const fn of<D: Duplex>() -> Self {
        Self {
            key: D::KEY,
            request: D::REQUEST,
            response: D::RESPONSE,
        }
    }

    /// Checks an untyped payload against the request shape.
    ///
    /// A `null` payload on an [`Shape::Empty`] key counts as absent.
    pub fn check_request(&self, payload: Option<&Value>) -> Result<(), ContractViolation> {
        match (self.request, payload) {
            (Shape::Empty, None | Some(Value::Null)) | (Shape::Payload, Some(_)) => Ok(()),
            (Shape::Empty, Some(_)) => Err(ContractViolation::UnexpectedPayload { key: self.key }),
            (Shape::Payload, None) => Err(ContractViolation::MissingPayload { key: self.key }),
        }
    }
}

/// A closed set of messages shared by a sender and a receiver.
pub trait Schema: Send + Sync + 'static {
    /// Human-readable schema name, used in diagnostics.
    const NAME: &'static str;

    /// Descriptors of every key in the schema.
    fn descriptors() -> &'static [Descriptor];

    /// Looks up the descriptor of `key`.
    ///
    /// The default scans [`Schema::descriptors`] linearly; large
    /// hand-written schemas should override it. `schema!` generates a `match`.
    fn descriptor(key: &str) -> Option<&'static Descriptor> {
        Self::descriptors().iter().find(|d| d.key == key)
    }

    /// Iterates over every key in the schema.
    fn keys() -> impl Iterator<Item = &'static str> {
        Self::descriptors().iter().map(|d| d.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Clock;
    struct Now;
    struct Reset;

    impl Duplex for Now {
        const KEY: &'static str = "clock.now";
        const REQUEST: Shape = Shape::Empty;
        const RESPONSE: Shape = Shape::Payload;
        type Request = ();
        type Response = u64;
    }

    impl Duplex for Reset {
        const KEY: &'static str = "clock.reset";
        const REQUEST: Shape = Shape::Payload;
        const RESPONSE: Shape = Shape::Empty;
        type Request = u64;
        type Response = ();
    }

    impl Schema for Clock {
        const NAME: &'static str = "Clock";

        fn descriptors() -> &'static [Descriptor] {
            const DESCRIPTORS: &[Descriptor] = &[Descriptor::of::<Now>(), Descriptor::of::<Reset>()];
            DESCRIPTORS
        }
    }

    #[test]
    fn test_descriptor_of() {
        let d = Descriptor::of::<Now>();
        assert_eq!(d.key, "clock.now");
        assert_eq!(d.request, Shape::Empty);
        assert_eq!(d.response, Shape::Payload);
    }

    #[test]
    fn test_default_lookup() {
        assert_eq!(Clock::descriptor("clock.reset"), Some(&Descriptor::of::<Reset>()));
        assert_eq!(Clock::descriptor("clock.stop"), None);
        assert_eq!(Clock::keys().collect::<Vec<_>>(), vec!["clock.now", "clock.reset"]);
    }

    #[test]
    fn test_check_request() {
        let now = Descriptor::of::<Now>();
        let reset = Descriptor::of::<Reset>();

        assert!(now.check_request(None).is_ok());
        assert!(now.check_request(Some(&Value::Null)).is_ok());
        assert_eq!(
            now.check_request(Some(&Value::from(1))),
            Err(ContractViolation::UnexpectedPayload { key: "clock.now" })
        );

        assert!(reset.check_request(Some(&Value::from(0))).is_ok());
        assert_eq!(
            reset.check_request(None),
            Err(ContractViolation::MissingPayload { key: "clock.reset" })
        );
    }
}
