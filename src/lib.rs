//! jrpc - JSON codec and JSON-RPC 1.1 over HTTP
//!
//! This is the main convenience crate that re-exports the jrpc sub-crates.
//! Use this crate if you want a single dependency for both the codec and
//! the client.
//!
//! # Architecture
//!
//! - **jrpc-core**: value model, parser, serializer, envelopes, errors, observability
//! - **jrpc-client**: transport trait, call sequence, diagnostics, client builder
//!
//! # Quick Start - Codec
//!
//! ```rust
//! use jrpc::{parse, Value};
//! use jrpc::core::serializer;
//!
//! let value = parse(r#"{"a": [1, 2.5, "x"]}"#).unwrap();
//! assert_eq!(serializer::to_string(&value).unwrap(), r#"{ "a" : [ 1, 2.5, "x" ] }"#);
//! assert_eq!(value.get("a").and_then(|a| a.as_array()).map(|a| a.len()), Some(3));
//! # let _ = Value::Null;
//! ```
//!
//! # Quick Start - Client
//!
//! ```rust,no_run
//! use jrpc::{ClientBuilder, Transport, Value};
//! use std::sync::Arc;
//!
//! # async fn example(transport: Arc<dyn Transport>) -> jrpc::Result<()> {
//! let client = ClientBuilder::new("jsonrpc://localhost:8080")
//!     .with_transport(transport)
//!     .build()?;
//!
//! let result = client.call_checked("add", &[Value::from(5), Value::from(3)]).await?;
//! println!("Result: {}", result);
//! # Ok(())
//! # }
//! ```

pub use jrpc_client as client;
pub use jrpc_core as core;

// Convenience re-exports of the most commonly used types
pub use jrpc_client::{CallDiagnostics, ClientBuilder, JrpcClient, Transport};
pub use jrpc_core::{parse, Error, Result, RpcFault, Value};
