//! Procedural macros for Duplex.
//!
//! Use through the `duplex` crate (feature `macros`), which re-exports
//! [`schema!`] and provides the `::duplex` paths the expansion refers to.

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod schema;

/// Declares a schema and one marker type per message.
///
/// ```rust,ignore
/// duplex::schema! {
///     /// Arithmetic service.
///     pub Calculator {
///         /// Adds two numbers.
///         "math.add" => MathAdd(AddRequest) -> i64,
///         "counter.increment" => CounterIncrement(i64),
///         "ping" => Ping,
///     }
/// }
/// ```
///
/// Each entry reads `"key" => Marker(Request) -> Response`:
///
/// - Without `(Request)` the message takes no payload. It implements
///   `Nullary` and is sent with `send_empty`.
/// - Without `-> Response` the message answers with no meaningful value
///   (`()`).
///
/// Every marker implements `Duplex` and `Member<Schema>`; the schema type
/// implements `Schema`. Duplicate keys or marker names are compile errors.
#[proc_macro]
pub fn schema(input: TokenStream) -> TokenStream {
    let def = parse_macro_input!(input as schema::SchemaDef);
    match schema::expand(def) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
