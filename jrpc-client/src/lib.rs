//! JSON-RPC 1.1 client over a pluggable HTTP transport
//!
//! This crate turns method calls into JSON-RPC request envelopes, hands them
//! to a [`Transport`] as HTTP POSTs and parses the answers with `jrpc-core`.
//! It does not open sockets itself.
//!
//! # Core Features
//!
//! - **Transport seam**: bring any HTTP stack by implementing [`Transport`]
//! - **Call sequence**: `Built → Sent → AwaitingResponse → Parsed | Failed`
//! - **Diagnostics**: opt-in record of the raw request and response
//! - **Protocols**: `jsonrpc` / `jsonrpcs` URL schemes with default ports
//! - **Observability**: OpenTelemetry metrics and `tracing` spans per call
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jrpc_client::{CallDiagnostics, ClientBuilder, Transport};
//! use jrpc_core::Value;
//! use std::sync::Arc;
//!
//! # async fn example(transport: Arc<dyn Transport>) -> jrpc_core::Result<()> {
//! let client = ClientBuilder::new("jsonrpc://localhost:8080")
//!     .with_transport(transport)
//!     .build()?;
//!
//! let mut info = CallDiagnostics::new();
//! let response = client.call_with_info(&mut info, "echo", &[Value::from("hi")]).await?;
//! println!("sent {:?}, got {}", info.request, response);
//! # Ok(())
//! # }
//! ```

pub mod call;
mod client;
mod client_builder;
mod diagnostics;
mod metrics;
pub mod transport;

pub use call::{error_kind, CallState};
pub use client::{JrpcClient, DEFAULT_VERSION};
pub use client_builder::ClientBuilder;
pub use diagnostics::CallDiagnostics;
pub use metrics::ClientMetrics;
pub use transport::{
    default_headers, Body, Endpoint, Headers, HttpRequest, HttpResponse, Protocol, ProtocolRegistry, Transport,
};
