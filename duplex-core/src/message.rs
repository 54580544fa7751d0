//! Message trait for payload types.

use serde::{Serialize, de::DeserializeOwned};

/// A marker trait for request and response payloads.
///
/// Payloads cross the transport boundary as [`serde_json::Value`], so every
/// message must be serializable in both directions. Messages must also be
/// `Send + Sync + 'static` to be safe for async use.
///
/// The trait is implemented automatically for every qualifying type.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct AddRequest { a: i64, b: i64 }
///
/// fn assert_message<M: Message>() {}
/// assert_message::<AddRequest>();
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Serialize + DeserializeOwned + Send + Sync + 'static`",
    note = "Payloads in Duplex cross an erased transport boundary as JSON values."
)]
pub trait Message: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Message for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}
