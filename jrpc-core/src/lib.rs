//! JSON codec and JSON-RPC envelopes for jrpc
//!
//! This crate is the transport-free half of jrpc:
//!
//! - **Value model**: [`Value`], an ordered, encoding-aware JSON tree
//! - **Parser**: JSON text to [`Value`], with line-numbered errors
//! - **Serializer**: [`Value`] to compact or indented JSON text
//! - **Codec**: the same, across a character-encoding boundary
//! - **Envelopes**: JSON-RPC 1.1 request, response and error builders
//! - **Interop**: serde and `serde_json` conversions
//! - **Observability**: `tracing` / OpenTelemetry bootstrap
//!
//! The `jrpc-client` crate adds the HTTP call sequence on top.
//!
//! # Example
//!
//! ```rust
//! use jrpc_core::{envelope, parse, RpcFault, Value};
//!
//! let request = envelope::request_with_positional_args(
//!     &Value::from("add"),
//!     None,
//!     Some(&Value::from("1.1")),
//!     &[Value::from(2), Value::from(3)],
//! )
//! .unwrap();
//! assert_eq!(request, r#"{ "version" : "1.1", "method" : "add", "params" : [ 2, 3 ] }"#);
//!
//! let answer = parse(r#"{ "version" : "1.1", "result" : 5 }"#).unwrap();
//! assert!(RpcFault::from_response(&answer).is_none());
//! assert_eq!(answer.get("result"), Some(&Value::Int(5)));
//! ```

pub mod codec;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod interop;
pub mod observability;
pub mod parser;
pub mod serializer;
pub mod value;

mod cursor;

pub use encoding::Encoding;
pub use error::{Error, ParseError, Result, RpcFault, TransportError, FAULT_NAME};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use parser::{parse, parse_with_encoding};
pub use serializer::Format;
pub use value::{Map, Text, Value};
