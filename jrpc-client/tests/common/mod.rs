//! Common test utilities for jrpc-client integration tests
//!
//! Mock transports that stand in for a real HTTP stack, plus helpers for
//! building canned response bodies.

#![allow(dead_code)]

use async_trait::async_trait;
use jrpc_client::{Body, ClientBuilder, HttpRequest, HttpResponse, JrpcClient, Transport};
use jrpc_core::TransportError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Answers every POST with `{"result": 42}` and remembers each request
#[derive(Default)]
pub struct EchoTransport {
    requests: Mutex<Vec<HttpRequest>>,
}

impl EchoTransport {
    pub const BODY: &'static str = r#"{"result": 42}"#;

    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Body of the most recent request as text
    pub fn last_body(&self) -> Option<String> {
        self.requests
            .lock()
            .last()
            .map(|r| String::from_utf8_lossy(&r.body).into_owned())
    }
}

#[async_trait]
impl Transport for EchoTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        Ok(HttpResponse::ok(Self::BODY))
    }
}

/// Plays back a fixed list of answers, one per call
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
        })
    }

    /// Shorthand for a script of `200 OK` text bodies
    pub fn bodies(bodies: &[&str]) -> Arc<Self> {
        Self::new(bodies.iter().map(|b| Ok(HttpResponse::ok(*b))).collect())
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("script exhausted".to_string())))
    }
}

/// Fails every POST with the same error
pub struct FailingTransport {
    error: TransportError,
}

impl FailingTransport {
    pub fn new(error: TransportError) -> Arc<Self> {
        Arc::new(Self { error })
    }
}

#[async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(self.error.clone())
    }
}

/// Answers every POST with an undecoded binary body
pub struct BinaryTransport {
    bytes: Vec<u8>,
}

impl BinaryTransport {
    pub fn new(bytes: &[u8]) -> Arc<Self> {
        Arc::new(Self { bytes: bytes.to_vec() })
    }
}

#[async_trait]
impl Transport for BinaryTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = HttpResponse::ok("");
        response.headers.insert("Content-Type".to_string(), "application/octet-stream".to_string());
        response.body = Body::Binary(self.bytes.clone());
        Ok(response)
    }
}

/// Client on `jsonrpc://localhost` backed by `transport`
pub fn client_with(transport: Arc<dyn Transport>) -> JrpcClient {
    ClientBuilder::new("jsonrpc://localhost")
        .with_transport(transport)
        .build()
        .unwrap()
}

/// Helper to create a JSON-RPC 1.1 success body
pub fn mock_response(result: serde_json::Value) -> String {
    serde_json::json!({ "version": "1.1", "result": result }).to_string()
}

/// Helper to create a JSON-RPC 1.1 error body
pub fn mock_error_response(code: i64, message: &str) -> String {
    serde_json::json!({
        "version": "1.1",
        "error": { "name": "JSONRPCError", "code": code, "message": message }
    })
    .to_string()
}
